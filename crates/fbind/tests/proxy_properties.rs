#![forbid(unsafe_code)]

//! Property tests over the proxied accessors: after any run of `set` calls
//! the mounted view shows the latest value of every key, and the model holds
//! exactly what was last written.

use std::rc::Rc;

use fbind::prelude::*;
use fbind_harness::MemoryDom;
use proptest::prelude::*;

const KEYS: [&str; 3] = ["a", "b", "c"];

fn arb_write() -> impl Strategy<Value = (usize, i32)> {
    (0..KEYS.len(), -50i32..50)
}

proptest! {
    #[test]
    fn view_follows_latest_writes(writes in proptest::collection::vec(arb_write(), 0..24)) {
        let dom = Rc::new(MemoryDom::from_markup(
            "<div id=\"app\"><p>{{a}}|{{b}}|{{c}}</p><input v-model=\"b\"></div>",
        ));
        let vm = ViewModel::new(
            Rc::clone(&dom),
            ViewModelOptions::<MemoryDom>::new()
                .mount("#app")
                .data(serde_json::json!({"a": 0, "b": 0, "c": 0})),
        )
        .unwrap();
        let p = dom.query_selector("p").unwrap();
        let input = dom.query_selector("input").unwrap();

        let mut latest = [0i32; 3];
        for (index, value) in writes {
            vm.set(KEYS[index], value).unwrap();
            latest[index] = value;
        }

        let expected = format!("{}|{}|{}", latest[0], latest[1], latest[2]);
        prop_assert_eq!(dom.text_content(&p), expected);
        prop_assert_eq!(dom.input_value(&input), latest[1].to_string());
        for (key, value) in KEYS.iter().zip(latest) {
            prop_assert_eq!(vm.get(key).unwrap(), Value::from(value));
        }
    }

    #[test]
    fn typed_input_is_stored_verbatim(text in "[a-z0-9 ]{0,12}") {
        let dom = Rc::new(MemoryDom::from_markup(
            "<div id=\"app\"><input v-model=\"q\"><b>{{q}}</b></div>",
        ));
        let vm = ViewModel::new(
            Rc::clone(&dom),
            ViewModelOptions::<MemoryDom>::new()
                .mount("#app")
                .data(serde_json::json!({"q": null})),
        )
        .unwrap();
        let input = dom.query_selector("input").unwrap();
        dom.type_into(input, &text).unwrap();

        prop_assert_eq!(vm.get("q").unwrap(), Value::from(text.as_str()));
        prop_assert_eq!(dom.text_content(&dom.query_selector("b").unwrap()), text);
    }
}
