#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use plotters::prelude::*;
use probemap::{
    ChainingMap, HashTable, OpenAddressingMap,
    hashing::{HashFn, additive_hash, positional_hash, sip_hash},
};
use rand::{Rng, distr::Alphanumeric};

// Largest key count measured; the additive hash clusters badly, so keep this modest
const MAX_KEYS: usize = 5_000;
const NUM_STEPS: usize = 10;
const INITIAL_CAPACITY: usize = 11;
const OUTPUT: &str = "probe_profile.png";

const HASHES: [(&str, HashFn); 3] =
    [("additive", additive_hash), ("positional", positional_hash), ("sip", sip_hash)];

/// Average and worst probe length over a set of present keys
#[derive(Debug, Clone, Copy, Default)]
struct ProbeStats {
    average: f64,
    worst: usize,
}

fn random_key(rng: &mut impl Rng) -> String {
    let len = rng.random_range(4..=12);
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

fn stats(keys: &[String], probe_len: impl Fn(&str) -> Option<usize>) -> ProbeStats {
    let lengths: Vec<usize> = keys.iter().filter_map(|key| probe_len(key.as_str())).collect();
    if lengths.is_empty() {
        return ProbeStats::default();
    }

    ProbeStats {
        average: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
        worst: lengths.iter().copied().max().unwrap_or(0),
    }
}

fn profile_open_addressing(keys: &[String], hash_fn: HashFn) -> probemap::Result<(ProbeStats, f64)> {
    let mut map = OpenAddressingMap::new(INITIAL_CAPACITY, hash_fn);
    for (value, key) in keys.iter().enumerate() {
        map.put(key, value)?;
    }
    Ok((stats(keys, |key| map.probe_len(key)), map.table_load()))
}

fn profile_chaining(keys: &[String], hash_fn: HashFn) -> probemap::Result<(ProbeStats, f64)> {
    let mut map = ChainingMap::new(INITIAL_CAPACITY, hash_fn);
    for (value, key) in keys.iter().enumerate() {
        map.put(key, value)?;
    }
    Ok((stats(keys, |key| map.probe_len(key)), map.table_load()))
}

fn draw_chart(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    title: &str,
    key_counts: &[usize],
    series: &[(String, Vec<f64>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [
        RGBColor(220, 50, 50),
        RGBColor(50, 90, 220),
        RGBColor(50, 180, 50),
        RGBColor(180, 50, 180),
        RGBColor(230, 140, 20),
        RGBColor(20, 160, 170),
    ];

    let max_y = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold(1.0, |max: f64, &x| max.max(x)) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(area)
        .caption(title, (font_family, 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0..MAX_KEYS, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Number of Keys Inserted")
        .y_desc("Probes")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (series_idx, (label, values)) in series.iter().enumerate() {
        let line_style = ShapeStyle::from(&colors[series_idx % colors.len()]).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                key_counts.iter().copied().zip(values.iter().copied()),
                line_style,
            ))?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let keys: Vec<String> = (0..MAX_KEYS).map(|_| random_key(&mut rng)).collect();
    let key_counts: Vec<usize> = (1..=NUM_STEPS).map(|step| MAX_KEYS * step / NUM_STEPS).collect();

    let mut averages: Vec<(String, Vec<f64>)> = Vec::new();
    let mut worsts: Vec<(String, Vec<f64>)> = Vec::new();

    for (hash_name, hash_fn) in HASHES {
        let mut oa_avg = Vec::new();
        let mut oa_worst = Vec::new();
        let mut sc_avg = Vec::new();
        let mut sc_worst = Vec::new();

        for &n_keys in &key_counts {
            let sample = &keys[..n_keys];
            let (oa, oa_load) = profile_open_addressing(sample, hash_fn)?;
            let (sc, sc_load) = profile_chaining(sample, hash_fn)?;

            println!(
                "{hash_name:>10} {n_keys:>6} keys | open addressing: avg {:.2}, worst {:>5}, load {:.2} | chaining: avg {:.2}, worst {:>5}, load {:.2}",
                oa.average, oa.worst, oa_load, sc.average, sc.worst, sc_load
            );

            oa_avg.push(oa.average);
            oa_worst.push(oa.worst as f64);
            sc_avg.push(sc.average);
            sc_worst.push(sc.worst as f64);
        }

        averages.push((format!("Open addressing / {hash_name}"), oa_avg));
        averages.push((format!("Chaining / {hash_name}"), sc_avg));
        worsts.push((format!("Open addressing / {hash_name}"), oa_worst));
        worsts.push((format!("Chaining / {hash_name}"), sc_worst));
    }

    let root = BitMapBackend::new(OUTPUT, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    draw_chart(&areas[0], "Average Probe Length", &key_counts, &averages)?;
    draw_chart(&areas[1], "Worst-Case Probe Length", &key_counts, &worsts)?;
    root.present()?;

    println!("Generated plot image: {OUTPUT}");

    Ok(())
}
