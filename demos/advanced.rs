//! Advanced estimator demonstration
//!
//! Replays a recorded micro:bit session through both estimation methods and
//! plots the results against the reference attitude.
//!
//! Features demonstrated:
//! - BASIC coordinate frame for micro:bit sensor axes
//! - Custom low-pass coefficient and pivot fallback policy
//! - FAMC and accelerometer-only estimates side by side
//! - Estimate outcome monitoring (updated, fell back, retained)
//!
//! Run with: `cargo run --example advanced`

use accelmagiq::{
    EstimateMethod, EstimateOutcome, Estimator, EstimatorSettings, Frame, PivotFallback,
};
use nalgebra::Vector3;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use serde::Deserialize;
use std::error::Error;

#[derive(Debug, Deserialize)]
struct SessionRow {
    #[serde(rename = "time_us")]
    time: u64,
    #[serde(rename = "accel_x_mg")]
    accel_x: f64,
    #[serde(rename = "accel_y_mg")]
    accel_y: f64,
    #[serde(rename = "accel_z_mg")]
    accel_z: f64,
    #[serde(rename = "mag_x_ut")]
    mag_x: f64,
    #[serde(rename = "mag_y_ut")]
    mag_y: f64,
    #[serde(rename = "mag_z_ut")]
    mag_z: f64,
    #[serde(rename = "roll_deg")]
    roll: f64,
    #[serde(rename = "pitch_deg")]
    pitch: f64,
    #[serde(rename = "yaw_deg")]
    yaw: f64,
}

impl SessionRow {
    fn seconds(&self) -> f64 {
        self.time as f64 / 1e6
    }
}

const SAMPLING_PERIOD_US: u64 = 20_000; // 50 Hz

struct Trace {
    euler: Vec<Vector3<f64>>,
    quaternion: Vec<[f64; 4]>,
    outcome: Vec<f64>,
}

fn replay(rows: &[SessionRow], method: EstimateMethod) -> Trace {
    let mut estimator = Estimator::with_settings(EstimatorSettings {
        method,
        frame: Frame::Basic,                              // micro:bit axes
        alpha: 0.3,                                       // moderate smoothing
        pivot_fallback: PivotFallback::AccelerometerOnly, // keep tilt when heading is undefined
        ..Default::default()
    });

    let mut trace = Trace {
        euler: Vec::with_capacity(rows.len()),
        quaternion: Vec::with_capacity(rows.len()),
        outcome: Vec::with_capacity(rows.len()),
    };

    for row in rows {
        let accelerometer = Vector3::new(row.accel_x, row.accel_y, row.accel_z);
        let magnetometer = Vector3::new(row.mag_x, row.mag_y, row.mag_z);

        estimator.sample_tick(row.time, accelerometer, magnetometer, SAMPLING_PERIOD_US);
        let outcome = estimator.estimate();

        trace.euler.push(estimator.euler_angles_degrees());
        trace.quaternion.push(estimator.components());
        trace.outcome.push(match outcome {
            EstimateOutcome::Updated => 0.0,
            EstimateOutcome::FellBack => 1.0,
            EstimateOutcome::Retained => 2.0,
        });
    }

    trace
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("Advanced estimator example - FAMC and tilt-only replay");

    let mut reader = csv::Reader::from_path("testdata/session.csv")?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let record: SessionRow = result?;
        rows.push(record);
    }

    println!("Processing {} sensor samples...", rows.len());

    let famc = replay(&rows, EstimateMethod::Famc);
    let tilt = replay(&rows, EstimateMethod::AccelerometerOnly);

    for (i, row) in rows.iter().enumerate().step_by(50) {
        let e = famc.euler[i];
        println!(
            "Sample {}: famc=({:.1}°,{:.1}°,{:.1}°) reference=({:.1}°,{:.1}°,{:.1}°)",
            i, e.x, e.y, e.z, row.roll, row.pitch, row.yaw
        );
    }

    let fell_back = famc.outcome.iter().filter(|&&o| o == 1.0).count();
    let retained = famc.outcome.iter().filter(|&&o| o == 2.0).count();
    println!("FAMC fell back {} times, retained {} times", fell_back, retained);

    println!("Generating plots...");
    create_plots(&rows, &famc, &tilt)?;

    println!("✓ Plots saved to advanced_plots.png");
    Ok(())
}

/// Draw one line series with a legend entry
fn draw_line(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    points: impl Iterator<Item = (f64, f64)>,
    color: RGBColor,
    label: &str,
) -> Result<(), Box<dyn Error>> {
    chart
        .draw_series(LineSeries::new(points, &color))?
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], color));
    Ok(())
}

/// Create the replay plots
///
/// Generates a 4-panel plot:
/// 1. FAMC Euler angles with the reference attitude
/// 2. Tilt-only Euler angles
/// 3. FAMC quaternion components
/// 4. FAMC estimate outcome
fn create_plots(rows: &[SessionRow], famc: &Trace, tilt: &Trace) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new("advanced_plots.png", (1000, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_by_breakpoints([] as [u32; 0], [400u32, 700, 1000]);

    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err("session is empty".into()),
    };
    let time_range = first.seconds()..last.seconds();
    let times = || rows.iter().map(SessionRow::seconds);

    // 1. FAMC Euler angles against the reference
    let mut euler_chart = ChartBuilder::on(&panels[0])
        .caption("FAMC Euler Angles and Reference", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -180f64..180f64)?;
    euler_chart.configure_mesh().y_desc("Degrees").draw()?;

    draw_line(&mut euler_chart, times().zip(famc.euler.iter().map(|e| e.x)), RED, "Roll")?;
    draw_line(&mut euler_chart, times().zip(famc.euler.iter().map(|e| e.y)), GREEN, "Pitch")?;
    draw_line(&mut euler_chart, times().zip(famc.euler.iter().map(|e| e.z)), BLUE, "Yaw")?;
    draw_line(&mut euler_chart, times().zip(rows.iter().map(|r| r.roll)), RGBColor(128, 0, 0), "Reference roll")?;
    draw_line(&mut euler_chart, times().zip(rows.iter().map(|r| r.pitch)), RGBColor(0, 100, 0), "Reference pitch")?;
    draw_line(&mut euler_chart, times().zip(rows.iter().map(|r| r.yaw)), RGBColor(0, 0, 128), "Reference yaw")?;
    euler_chart.configure_series_labels().draw()?;

    // 2. Tilt-only Euler angles
    let mut tilt_chart = ChartBuilder::on(&panels[1])
        .caption("Tilt-only Euler Angles", ("sans-serif", 16))
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -90f64..90f64)?;
    tilt_chart.configure_mesh().y_desc("Degrees").draw()?;

    draw_line(&mut tilt_chart, times().zip(tilt.euler.iter().map(|e| e.x)), RED, "Roll")?;
    draw_line(&mut tilt_chart, times().zip(tilt.euler.iter().map(|e| e.y)), GREEN, "Pitch")?;
    draw_line(&mut tilt_chart, times().zip(tilt.euler.iter().map(|e| e.z)), BLUE, "Yaw")?;
    tilt_chart.configure_series_labels().draw()?;

    // 3. Quaternion components
    let mut quaternion_chart = ChartBuilder::on(&panels[2])
        .caption("FAMC Quaternion", ("sans-serif", 16))
        .margin(5)
        .x_label_area_size(0)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range.clone(), -1.1f64..1.1f64)?;
    quaternion_chart.configure_mesh().draw()?;

    let colors = [BLACK, RED, GREEN, BLUE];
    for (index, name) in ["w", "x", "y", "z"].iter().enumerate() {
        draw_line(
            &mut quaternion_chart,
            times().zip(famc.quaternion.iter().map(|q| q[index])),
            colors[index],
            name,
        )?;
    }
    quaternion_chart.configure_series_labels().draw()?;

    // 4. Outcome
    let mut outcome_chart = ChartBuilder::on(&panels[3])
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(time_range, -0.2f64..2.2f64)?;
    outcome_chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_label_formatter(&|y| {
            if *y < 0.5 {
                "Updated".to_string()
            } else if *y < 1.5 {
                "Fell back".to_string()
            } else {
                "Retained".to_string()
            }
        })
        .draw()?;

    draw_line(&mut outcome_chart, times().zip(famc.outcome.iter().copied()), CYAN, "FAMC outcome")?;
    outcome_chart.configure_series_labels().draw()?;

    root.present()?;
    Ok(())
}
