#![no_main]

use fbind_harness::MemoryDom;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let dom = MemoryDom::from_markup(data);
    let html = dom.inner_html(dom.root());
    if !data.contains('<') {
        assert_eq!(html, data);
    }
});
