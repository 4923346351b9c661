//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Statistics collector

use stats::{MinMax, OnlineStats};
use std::collections::BTreeMap;
use std::fmt;

type MeasurementType = u64;

struct StatCollector {
    online: OnlineStats,
    minmax: MinMax<MeasurementType>,
}

pub struct StatResults {
    pub len: usize,
    pub min: MeasurementType,
    pub max: MeasurementType,
    pub mean: f64,
    pub stddev: f64,
    pub sum: MeasurementType,
}

/// Measurements keyed by name, e.g. `z10.records_per_tile`
pub struct Statistics(BTreeMap<String, (StatCollector, MeasurementType)>);

impl Statistics {
    pub fn new() -> Statistics {
        Statistics(BTreeMap::new())
    }
    pub fn add(&mut self, key: &str, value: MeasurementType) {
        let (collector, sum) = self.0.entry(key.to_string()).or_insert_with(|| {
            (
                StatCollector {
                    online: OnlineStats::new(),
                    minmax: MinMax::new(),
                },
                0,
            )
        });
        collector.online.add(value);
        collector.minmax.add(value);
        *sum += value;
    }
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
    /// Return the current results.
    pub fn results(&self, key: &str) -> StatResults {
        if let Some((collector, sum)) = self.0.get(key) {
            StatResults {
                len: collector.minmax.len(),
                min: *collector.minmax.min().unwrap_or(&0),
                max: *collector.minmax.max().unwrap_or(&0),
                mean: collector.online.mean(),
                stddev: collector.online.stddev(),
                sum: *sum,
            }
        } else {
            StatResults {
                len: 0,
                min: 0,
                max: 0,
                mean: 0.0,
                stddev: 0.0,
                sum: 0,
            }
        }
    }
    pub fn as_csv(&self) -> String {
        let mut csv = "key,count,sum,min,max,mean,stddev\n".to_string();
        for key in self.0.keys() {
            let res = self.results(key);
            csv.push_str(&format!(
                "{},{},{},{},{},{:.3},{:.3}\n",
                key, res.len, res.sum, res.min, res.max, res.mean, res.stddev
            ));
        }
        csv
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Statistics::new()
    }
}

impl fmt::Debug for StatResults {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "#measurements: {}, sum: {}, min: {}, max: {}, mean: {:.3} +/- {:.3}",
            self.len, self.sum, self.min, self.max, self.mean, self.stddev
        )
    }
}

impl fmt::Debug for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for key in self.0.keys() {
            let res = self.results(&key);
            write!(f, "{}: {:?}\n", key, res)?;
        }
        Ok(())
    }
}

#[test]
fn usage() {
    let mut stats = Statistics::new();
    stats.add("z6.records_per_tile", 1);
    assert_eq!(stats.results("z6.records_per_tile").mean, 1.0);
    stats.add("z6.records_per_tile", 2);
    assert_eq!(stats.results("z6.records_per_tile").mean, 1.5);
    stats.add("z7.records_per_tile", 2);
    assert_eq!(stats.results("z7.records_per_tile").mean, 2.0);
    stats.add("z6.records_per_tile", 3);
    let res = stats.results("z6.records_per_tile");
    assert_eq!(res.mean, 2.0);
    assert_eq!(res.stddev, 0.816496580927726);
    assert_eq!(res.len, 3);
    assert_eq!(res.min, 1);
    assert_eq!(res.max, 3);
    assert_eq!(res.sum, 6);

    assert_eq!(stats.results("z8.records_per_tile").mean, 0.0);
    assert_eq!(
        stats.keys(),
        vec!["z6.records_per_tile", "z7.records_per_tile"]
    );
}

#[test]
fn csv_output() {
    let mut stats = Statistics::new();
    stats.add("z10.points_per_tile", 4);
    stats.add("z10.points_per_tile", 6);
    assert_eq!(
        stats.as_csv(),
        "key,count,sum,min,max,mean,stddev\nz10.points_per_tile,2,10,4,6,5.000,1.000\n"
    );
}
