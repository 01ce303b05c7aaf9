/// Unix time of 2023-08-02 00:00 UTC, the date in every fixture header
pub const FIXTURE_EPOCH: f64 = 1_690_934_400.0;

/// Time of day the fixtures start at
pub const FIXTURE_START: u32 = 36_000;

/// IGC log with one valid fix at each time of day, drifting east and climbing
pub fn igc_log(times: &[u32]) -> String {
    let mut log = String::from("AXXX001 fixture\nHFDTE020823\n");
    for (i, t) in times.iter().enumerate() {
        let (h, m, s) = (t / 3600, (t / 60) % 60, t % 60);
        let altitude = 1000 + 2 * i;
        log.push_str(&format!(
            "B{:02}{:02}{:02}4600000N{:08}EA{:05}{:05}\n",
            h,
            m,
            s,
            700_000 + i * 20,
            altitude,
            altitude
        ));
    }
    log
}

/// `count` fixes `interval` seconds apart starting at `FIXTURE_START`
pub fn steady_times(count: u32, interval: u32) -> Vec<u32> {
    (0..count).map(|i| FIXTURE_START + i * interval).collect()
}

/// Ten seconds of fixes followed by a jump back eight seconds
pub fn warped_times() -> Vec<u32> {
    let mut times = steady_times(11, 1);
    times.extend((2..=6).map(|s| FIXTURE_START + s));
    times
}

/// Virtual time of a fixture time of day
pub fn fixture_time(time_of_day: u32) -> f64 {
    FIXTURE_EPOCH + time_of_day as f64
}
