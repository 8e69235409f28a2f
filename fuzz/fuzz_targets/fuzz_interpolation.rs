#![no_main]

use fbind_compiler::Interpolation;
use fbind_core::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let interpolation = Interpolation::parse(data);
    let rendered = interpolation.render(|_| Ok(Value::Null));
    if !interpolation.has_placeholders() {
        assert_eq!(rendered.as_deref(), Ok(data));
    }
});
