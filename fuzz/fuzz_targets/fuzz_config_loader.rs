#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not. A config that
    // validates must also convert into loop settings the builder accepts.
    let Ok(cfg) = toml::from_str::<speedctl_config::Config>(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let settings = speedctl_core::LoopSettings::from(&cfg);
    assert!(
        speedctl_core::validate_settings(&settings).is_ok(),
        "validated config produced rejected settings: {settings:?}"
    );
    let _ = settings.bindings.hint();
});
