#![no_main]

use fbind_compiler::DirectiveBinding;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, &str)| {
    let (name, value) = input;
    if let Ok(Some(binding)) = DirectiveBinding::parse(name, value) {
        assert_eq!(binding.attribute, name);
    }
});
