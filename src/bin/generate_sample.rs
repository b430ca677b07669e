//! Writes a deterministic sample dataset to `data/year_df.csv` so the
//! dashboard runs out of the box. Binary targets are separate crate roots,
//! so the column lists are spelled out here as they are on disk.

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const STATES: [(&str, &str, f64); 10] = [
    ("Texas", "TX", 25.1e6),
    ("California", "CA", 37.3e6),
    ("New York", "NY", 19.4e6),
    ("Florida", "FL", 18.8e6),
    ("Illinois", "IL", 12.8e6),
    ("Ohio", "OH", 11.5e6),
    ("Georgia", "GA", 9.7e6),
    ("Colorado", "CO", 5.0e6),
    ("Oregon", "OR", 3.8e6),
    ("Vermont", "VT", 0.63e6),
];

/// Crime rates per 100k residents, roughly shaped like FBI UCR magnitudes.
const CRIME_RATES: [(&str, f64); 9] = [
    ("violent_crime", 400.0),
    ("homicide", 5.0),
    ("rape_legacy", 27.0),
    ("robbery", 110.0),
    ("aggravated_assault", 250.0),
    ("property_crime", 2900.0),
    ("burglary", 700.0),
    ("larceny", 1900.0),
    ("motor_vehicle_theft", 230.0),
];

fn main() {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("data").expect("Failed to create data directory");
    let output_path = "data/year_df.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");

    let mut header = vec!["Year", "Date", "State", "State_Abbrev"];
    header.extend([
        "Gas_Per_Gallon",
        "MENTHLTH",
        "PHYSHLTH",
        "Median_Income",
        "TAVG",
        "TMIN",
        "TMAX",
        "INJURIES_DIRECT",
        "INJURIES_INDIRECT",
        "DEATHS_DIRECT",
        "DEATHS_INDIRECT",
        "DAMAGE_PROPERTY",
        "DAMAGE_CROPS",
        "SPI",
        "Population",
    ]);
    header.extend(CRIME_RATES.iter().map(|(name, _)| *name));
    writer.write_record(&header).expect("Failed to write header");

    let mut rows = 0usize;
    for year in 2000..=2014 {
        for (state, abbrev, population) in STATES {
            // Mild growth plus noise so time series trend visibly.
            let growth = 1.0 + 0.01 * (year - 2000) as f64;
            let pop = population * growth * rng.gauss(1.0, 0.005);
            let tavg = rng.gauss(13.0, 4.0);

            let mut record: Vec<String> = vec![
                year.to_string(),
                format!("{year}-12-31"),
                state.to_string(),
                abbrev.to_string(),
            ];
            record.push(format!("{:.2}", rng.gauss(2.6, 0.4) + 0.03 * (year - 2000) as f64));
            record.push(format!("{:.2}", rng.gauss(3.5, 0.5)));
            record.push(format!("{:.2}", rng.gauss(3.8, 0.5)));
            record.push(format!("{:.0}", rng.gauss(52_000.0, 6_000.0)));
            record.push(format!("{tavg:.2}"));
            record.push(format!("{:.2}", tavg - rng.gauss(6.0, 1.0)));
            record.push(format!("{:.2}", tavg + rng.gauss(6.0, 1.0)));
            record.push(format!("{:.0}", rng.gauss(120.0, 40.0).max(0.0)));
            record.push(format!("{:.0}", rng.gauss(40.0, 15.0).max(0.0)));
            record.push(format!("{:.0}", rng.gauss(25.0, 10.0).max(0.0)));
            record.push(format!("{:.0}", rng.gauss(8.0, 4.0).max(0.0)));
            record.push(format!("{:.0}", rng.gauss(40e6, 15e6).max(0.0)));
            record.push(format!("{:.0}", rng.gauss(8e6, 3e6).max(0.0)));
            record.push(format!("{:.2}", rng.gauss(0.0, 1.0)));
            record.push(format!("{pop:.0}"));

            for (_, rate) in CRIME_RATES {
                let count = rate / 100_000.0 * pop * rng.gauss(1.0, 0.08);
                record.push(format!("{:.0}", count.max(0.0)));
            }

            writer.write_record(&record).expect("Failed to write row");
            rows += 1;
        }
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {rows} rows to {output_path}");
}
