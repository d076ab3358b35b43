use std::io::Write;
use tempfile::NamedTempFile;

/// Key events generated as `4 + 0.02 TU + 0.05 NU + 0.1 S - 30 BR` plus a
/// small alternating residual.
pub fn ga4_csv(rows: usize) -> String {
    let mut csv = String::from("Date, Total users ,New users , Sessions,Bounce rate,Key events\n");
    for i in 0..rows {
        let f = i as f64;
        let total_users = 1000.0 + 13.0 * f + ((i * 7) % 19) as f64 * 4.0;
        let new_users = 380.0 + ((i * 5) % 17) as f64 * 3.0;
        let sessions = 1150.0 + 9.0 * f + ((i * 11) % 23) as f64 * 6.0;
        let bounce_rate = 0.42 + ((i * 3) % 13) as f64 * 0.004;
        let noise = if i % 2 == 0 { 0.25 } else { -0.25 };
        let key_events =
            4.0 + 0.02 * total_users + 0.05 * new_users + 0.1 * sessions - 30.0 * bounce_rate + noise;
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64);
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            date.format("%Y%m%d"),
            total_users,
            new_users,
            sessions,
            bounce_rate,
            key_events
        ));
    }
    csv
}

pub fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
