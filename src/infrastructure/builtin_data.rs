// Built-in benchmark results
use crate::application::observation_source::{LoadReport, ObservationSource};
use crate::domain::observation::Observation;

/// (processor, threads, OM time in s, SA time in s)
const BENCHMARK_RESULTS: &[(&str, u32, f64, f64)] = &[
    ("Intel Core i9-13900K", 1, 165.998, 7.6108),
    ("Intel Core i9-13900K", 2, 172.821, 1.7591),
    ("Intel Core i9-13900K", 3, 173.704, 1.7450),
    ("Intel Core i9-13900K", 4, 173.420, 1.3633),
    ("Intel Core i9-13900K", 5, 167.302, 1.1606),
    ("Intel Core i9-13900K", 6, 179.375, 1.0053),
    ("Intel Core i9-13900K", 7, 177.839, 1.0019),
    ("Intel Core i9-13900K", 8, 170.422, 0.9992),
    ("Intel Core i9-13900K", 9, 171.258, 0.9981),
    ("Intel Core i9-13900K", 10, 173.748, 0.9709),
    ("Intel Core i9-13900K", 11, 181.269, 0.9746),
    ("Intel Core i9-13900K", 12, 179.265, 0.9603),
    ("Intel Core i9-13900K", 13, 178.592, 0.9578),
    ("Intel Core i9-13900K", 14, 173.257, 0.9528),
    ("Intel Core i9-13900K", 15, 174.146, 0.9478),
    ("Intel Core i9-13900K", 16, 167.549, 0.9428),
    ("Intel Core i9-13900K", 17, 167.967, 0.8903),
    ("Intel Core i9-13900K", 18, 161.175, 0.8778),
    ("Intel Core i9-13900K", 19, 176.955, 0.8553),
    ("Intel Core i9-13900K", 20, 159.841, 0.8328),
    ("Intel Core i9-13900K", 21, 158.875, 0.6303),
    ("Intel Core i9-13900K", 22, 180.061, 0.6102),
    ("Intel Core i9-13900K", 23, 173.793, 0.5891),
    ("Intel Core i9-13900K", 24, 179.338, 0.5230),
    ("Intel Core i9-13900K", 25, 180.219, 0.5115),
    ("Intel Core i9-13900K", 26, 181.192, 0.5000),
    ("Intel Core i9-13900K", 27, 177.954, 0.4885),
    ("Intel Core i9-13900K", 28, 166.130, 0.4170),
    ("Intel Core i9-13900K", 29, 176.288, 0.4055),
    ("Intel Core i9-13900K", 30, 178.632, 0.3540),
    ("Intel Core i9-13900K", 31, 171.817, 0.3425),
    ("Intel Core i9-13900K", 32, 171.786, 0.3110),

    ("Intel Core i5-12400", 1, 228.78, 11.84313),
    ("Intel Core i5-12400", 2, 205.55, 3.1455),
    ("Intel Core i5-12400", 3, 207.25, 3.0223),
    ("Intel Core i5-12400", 4, 219.59, 2.79028),
    ("Intel Core i5-12400", 5, 219.04, 2.71200),
    ("Intel Core i5-12400", 6, 219.08, 2.197453),
    ("Intel Core i5-12400", 7, 210.11, 2.17898),
    ("Intel Core i5-12400", 8, 217.61, 2.03873),
    ("Intel Core i5-12400", 9, 225.80, 2.00546),
    ("Intel Core i5-12400", 10, 224.65, 1.90800),
    ("Intel Core i5-12400", 11, 207.40, 1.89340),
    ("Intel Core i5-12400", 12, 229.25, 1.83452),

    ("Intel Core i5-10400F", 1, 279.456, 12.84313),
    ("Intel Core i5-10400F", 2, 291.123, 3.1490),
    ("Intel Core i5-10400F", 3, 288.789, 2.9650),
    ("Intel Core i5-10400F", 4, 294.001, 2.8585),
    ("Intel Core i5-10400F", 5, 280.555, 2.8417),
    ("Intel Core i5-10400F", 6, 292.345, 2.8274),
    ("Intel Core i5-10400F", 7, 285.678, 2.5675),
    ("Intel Core i5-10400F", 8, 290.987, 2.4387),
    ("Intel Core i5-10400F", 9, 270.234, 2.3254),
    ("Intel Core i5-10400F", 10, 287.890, 2.2180),
    ("Intel Core i5-10400F", 11, 293.456, 2.2008),
    ("Intel Core i5-10400F", 12, 286.789, 2.1399),

    ("Intel Xeon X5680", 1, 485.123, 32.2033),
    ("Intel Xeon X5680", 2, 501.789, 31.0291),
    ("Intel Xeon X5680", 3, 490.567, 31.4650),
    ("Intel Xeon X5680", 4, 483.999, 31.4585),
    ("Intel Xeon X5680", 5, 504.111, 31.8711),
    ("Intel Xeon X5680", 6, 496.222, 30.9563),
    ("Intel Xeon X5680", 7, 488.333, 30.0775),
    ("Intel Xeon X5680", 8, 499.444, 29.3552),
    ("Intel Xeon X5680", 9, 484.555, 29.1227),
    ("Intel Xeon X5680", 10, 503.666, 28.6135),
    ("Intel Xeon X5680", 11, 492.777, 28.4155),
    ("Intel Xeon X5680", 12, 487.888, 28.2818),

    ("Intel Core i7-8600U", 1, 737.18, 15.4439),
    ("Intel Core i7-8600U", 2, 708.64, 5.6211),
    ("Intel Core i7-8600U", 3, 727.26, 5.2782),
    ("Intel Core i7-8600U", 4, 719.03, 4.9870),
    ("Intel Core i7-8600U", 5, 713.47, 4.8363),
    ("Intel Core i7-8600U", 6, 737.33, 4.7900),
    ("Intel Core i7-8600U", 7, 724.43, 4.7912),
    ("Intel Core i7-8600U", 8, 745.19, 4.3633),

    ("AMD Ryzen 5 7535HS", 1, 337.085, 13.1583),
    ("AMD Ryzen 5 7535HS", 2, 312.039, 3.6231),
    ("AMD Ryzen 5 7535HS", 3, 322.966, 3.3233),
    ("AMD Ryzen 5 7535HS", 4, 331.815, 2.7739),
    ("AMD Ryzen 5 7535HS", 5, 323.198, 2.7235),
    ("AMD Ryzen 5 7535HS", 6, 338.604, 2.6260),
    ("AMD Ryzen 5 7535HS", 7, 318.339, 2.5235),
    ("AMD Ryzen 5 7535HS", 8, 324.357, 2.45652),
    ("AMD Ryzen 5 7535HS", 9, 313.659, 2.47323),
    ("AMD Ryzen 5 7535HS", 10, 323.354, 2.5379),
    ("AMD Ryzen 5 7535HS", 11, 316.371, 2.3661),
    ("AMD Ryzen 5 7535HS", 12, 338.241, 2.31333),

    ("AMD Ryzen 5 7530U", 1, 250.940, 12.999141),
    ("AMD Ryzen 5 7530U", 2, 255.135, 3.375539),
    ("AMD Ryzen 5 7530U", 3, 256.637, 3.275369),
    ("AMD Ryzen 5 7530U", 4, 255.057, 2.330764),
    ("AMD Ryzen 5 7530U", 5, 253.923, 2.853088),
    ("AMD Ryzen 5 7530U", 6, 249.392, 2.735806),
    ("AMD Ryzen 5 7530U", 7, 250.393, 2.56469),
    ("AMD Ryzen 5 7530U", 8, 255.239, 2.467956),
    ("AMD Ryzen 5 7530U", 9, 257.817, 2.423144),
    ("AMD Ryzen 5 7530U", 10, 259.677, 2.327546),
    ("AMD Ryzen 5 7530U", 11, 253.456, 2.704307),
    ("AMD Ryzen 5 7530U", 12, 250.298, 2.502371),
];

pub fn builtin_observations() -> Vec<Observation> {
    BENCHMARK_RESULTS
        .iter()
        .map(|&(processor, threads, om_time, sa_time)| {
            Observation::new(processor, threads, om_time, sa_time)
        })
        .collect()
}

/// Serves the measured results above without touching the file system.
#[derive(Debug, Clone, Default)]
pub struct BuiltinSource;

impl ObservationSource for BuiltinSource {
    fn describe(&self) -> String {
        "built-in benchmark table".to_string()
    }

    fn load(&self) -> anyhow::Result<LoadReport> {
        Ok(LoadReport::new(builtin_observations(), Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::normalizer::normalize;
    use crate::domain::observation::Manufacturer;

    #[test]
    fn test_builtin_table_normalizes_cleanly() {
        let report = BuiltinSource.load().unwrap();
        let series_map = normalize(&report.observations).unwrap();

        assert_eq!(series_map.len(), 7);
        assert_eq!(series_map["Intel Core i9-13900K"].threads.len(), 32);
        assert_eq!(series_map["Intel Core i7-8600U"].threads, (1..=8).collect::<Vec<u32>>());
        assert_eq!(series_map["Intel Xeon X5680"].manufacturer, Manufacturer::Intel);
        assert_eq!(series_map["AMD Ryzen 5 7530U"].manufacturer, Manufacturer::Amd);
    }
}
