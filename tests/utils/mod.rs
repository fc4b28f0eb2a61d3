use flageval::{FeatureFlag, TargetRule, Value, Variation};
use log::kv::Key;
use log::{set_max_level, Level, Log, Metadata, Record};
use rand::distr::{Alphanumeric, SampleString};
use std::cell::RefCell;

pub fn rand_user_key() -> String {
    format!("{}@test.com", rand_str(16))
}

fn rand_str(len: usize) -> String {
    Alphanumeric.sample_string(&mut rand::rng(), len)
}

/// The boolean flag used throughout the evaluation tests.
pub fn sample_flag(on: bool) -> FeatureFlag<bool> {
    let target_user_on = TargetRule::new("key", vec!["targetOn@test.com".into()]);
    let target_group_on = TargetRule::new("groups", vec!["google".into(), "microsoft".into()]);
    let target_int_on = TargetRule::new(
        "customerRank",
        vec![Value::Int(1000), Value::Bool(true), Value::Float(32.4)],
    );
    let target_user_off = TargetRule::new("key", vec!["targetOff@test.com".into()]);
    let target_group_off = TargetRule::new("groups", vec!["oracle".into()]);
    let target_boolean_off = TargetRule::new("isMember", vec![Value::Bool(true)]);

    FeatureFlag::builder("sample.flag")
        .name("Sample flag")
        .on(on)
        .salt("feefifofum")
        .variation(
            Variation::new(true, 0)
                .target(target_user_on)
                .target(target_group_on)
                .target(target_int_on),
        )
        .variation(
            Variation::new(false, 0)
                .target(target_user_off)
                .target(target_group_off)
                .target(target_boolean_off),
        )
        .build()
        .unwrap()
}

pub fn two_way_flag(key: &str, salt: &str, first: i64, second: i64) -> FeatureFlag<String> {
    FeatureFlag::builder(key)
        .on(true)
        .salt(salt)
        .variation(Variation::new("first".to_owned(), first))
        .variation(Variation::new("second".to_owned(), second))
        .build()
        .unwrap()
}

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
            Level::Error => "[ERROR]",
            Level::Warn => "[WARN]",
            Level::Info => "[INFO]",
            Level::Debug => "[DEBUG]",
            Level::Trace => "[TRACE]",
        };
        println!("{level} {}", record.args());
    }

    fn flush(&self) {}
}

pub struct RecordingLogger {}

impl RecordingLogger {
    thread_local!(pub static LOGS: RefCell<String> = RefCell::new(String::default()));
}

impl Log for RecordingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.target().contains("flageval")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARNING",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let event_id = record
            .key_values()
            .get(Key::from("event_id"))
            .and_then(|id| id.to_i64())
            .unwrap_or_default();
        Self::LOGS.with_borrow_mut(|l| l.push_str(format!("{level} [{event_id}] {}\n", record.args()).as_str()));
    }

    fn flush(&self) {}
}

pub fn log_record_init() {
    set_max_level(log::LevelFilter::Info);
    _ = log::set_logger(&RecordingLogger {});
}
