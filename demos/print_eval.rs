use flageval::*;
use log::kv::Key;
use log::{Level, LevelFilter, Log, Metadata, Record};

fn main() {
    // Info level logging helps to inspect the feature flag evaluation process.
    // Use the default Warning level to avoid too detailed logging in your application.
    log::set_max_level(LevelFilter::Info);
    log::set_logger(&PrintLog {}).unwrap();

    let flag = FeatureFlag::<bool>::from_json(
        r#"{
            "key": "isPOCFeatureEnabled",
            "on": true,
            "salt": "feefifofum",
            "variations": [
                {
                    "value": true,
                    "weight": 20,
                    "targets": [
                        {"attribute": "email", "values": ["poc@example.com"]},
                        {"attribute": "groups", "values": ["beta-testers"]}
                    ]
                },
                {"value": false, "weight": 80}
            ]
        }"#,
    )
    .unwrap();

    let user = User::new("#SOME-USER-ID#").email("poc@example.com");
    let is_poc_enabled = flag.evaluate(&user).unwrap_or_default();

    println!("isPOCFeatureEnabled: {is_poc_enabled}");

    let user = User::new("#OTHER-USER-ID#").custom("groups", vec!["early-adopters"]);
    let details = flag.evaluate_details(&user);

    println!("isPOCFeatureEnabled: {:?} ({})", details.value, details.reason);
}

// Example log implementation.
pub struct PrintLog {}

impl Log for PrintLog {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("flageval")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let event_id = record.key_values().get(Key::from("event_id")).unwrap();
        println!("{level} [{event_id}] {}", record.args());
    }

    fn flush(&self) {}
}
