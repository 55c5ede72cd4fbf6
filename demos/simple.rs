use accelmagiq::Estimator;
use nalgebra::Vector3;

const SAMPLING_PERIOD_US: u64 = 20_000; // 20 ms sampling period

fn main() {
    let mut estimator = Estimator::new();

    for i in 0..10 {
        // this loop should repeat each time the host's periodic hook fires
        let now = i * SAMPLING_PERIOD_US; // replace this with a monotonic microsecond clock
        let accelerometer = Vector3::new(0.0, 0.0, 1024.0); // replace this with actual accelerometer data
        let magnetometer = Vector3::new(24.0, 0.0, -41.0); // replace this with actual magnetometer data

        estimator.sample_tick(now, accelerometer, magnetometer, SAMPLING_PERIOD_US);
        estimator.estimate();

        let [w, x, y, z] = estimator.components();
        let euler = estimator.euler_angles_degrees();

        println!(
            "Q: ({:.3}, {:.3}, {:.3}, {:.3})  Roll: {:.2}, Pitch: {:.2}, Yaw: {:.2}",
            w, x, y, z, euler.x, euler.y, euler.z
        );
    }
}
