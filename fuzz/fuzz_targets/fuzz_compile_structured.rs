#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use fbind_compiler::{MethodTable, compile};
use fbind_core::intercept_root;
use fbind_harness::{DomEvent, MemoryDom};
use libfuzzer_sys::fuzz_target;

const KEYS: [&str; 4] = ["a", "b", "c", "d"];

#[derive(Arbitrary, Debug)]
enum FuzzNode {
    Text(String),
    Placeholder(u8),
    Directive { kind: u8, key: u8 },
    Element(Vec<FuzzNode>),
}

impl FuzzNode {
    fn write(&self, out: &mut String, depth: usize) {
        match self {
            FuzzNode::Text(text) => out.extend(text.chars().filter(|c| !"<>&{}".contains(*c))),
            FuzzNode::Placeholder(key) => {
                out.push_str("{{");
                out.push_str(KEYS[usize::from(*key) % KEYS.len()]);
                out.push_str("}}");
            }
            FuzzNode::Directive { kind, key } => {
                let key = KEYS[usize::from(*key) % KEYS.len()];
                let attr = match kind % 4 {
                    0 => "v-text",
                    1 => ":title",
                    2 => "v-model",
                    _ => "v-html",
                };
                out.push_str(&format!("<span {attr}=\"{key}\"></span>"));
            }
            FuzzNode::Element(children) => {
                out.push_str("<div>");
                if depth < 8 {
                    for child in children {
                        child.write(out, depth + 1);
                    }
                }
                out.push_str("</div>");
            }
        }
    }
}

fuzz_target!(|input: (Vec<FuzzNode>, Vec<(u8, i32)>)| {
    let (nodes, writes) = input;
    let mut markup = String::new();
    for node in &nodes {
        if markup.len() > 4096 {
            break;
        }
        node.write(&mut markup, 0);
    }

    let model = intercept_root(serde_json::json!({"a": 1, "b": "x", "c": null, "d": true}))
        .expect("object model");
    let dom = Rc::new(MemoryDom::from_markup(&markup));
    let methods: MethodTable<DomEvent> = MethodTable::new();
    let Ok(_scope) = compile(&dom, &dom.root(), &model, &methods) else {
        return;
    };
    for (key, value) in writes.into_iter().take(64) {
        let _ = model.write(KEYS[usize::from(key) % KEYS.len()], value);
    }
});
