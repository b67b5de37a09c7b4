//! Property-based invariants for rendering and re-rendering.
//!
//! 1. Synchronous consistency: after a write that differs from the watcher
//!    baseline returns, the root markup shows the new value.
//! 2. Rendering substitutes every slot in place and nothing else.
//! 3. Recompiling unchanged data is byte-identical modulo the binding id.
//! 4. Every render with a binding adds exactly one table entry.

use std::rc::Rc;

use proptest::prelude::*;
use rayactive::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Piece {
    Text(String),
    Slot(&'static str),
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    prop_oneof![
        "[a-z <>/=:-]{0,8}".prop_map(Piece::Text),
        prop_oneof![Just("a"), Just("b"), Just("c")].prop_map(Piece::Slot),
    ]
}

fn template_strategy() -> impl Strategy<Value = Vec<Piece>> {
    proptest::collection::vec(piece_strategy(), 0..=12)
}

fn source_of(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(|p| match p {
            Piece::Text(t) => t.clone(),
            Piece::Slot(k) => format!("{{{{{k}}}}}"),
        })
        .collect()
}

fn mount(vm: ViewModel) -> (Rc<MemoryHost>, RayActive) {
    let host = Rc::new(MemoryHost::new().with_element("root"));
    let config = EngineConfig::default().with_sequential_ids("p");
    let engine = RayActive::with_config(vm, host.clone(), config).expect("mount");
    (host, engine)
}

// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn writes_are_visible_when_they_return(
        initial in "[a-z]{1,4}",
        writes in proptest::collection::vec("[a-z]{1,4}", 1..16),
    ) {
        let vm = ViewModel::new("<p>{{a}}</p>").with_data("a", initial.as_str());
        let (host, engine) = mount(vm);
        let mut renders = 1u64;
        for value in &writes {
            engine.data().set("a", value.as_str()).expect("write");
            if *value != initial {
                renders += 1;
                let html = host.inner_html(&engine.root()).expect("html");
                prop_assert_eq!(html, format!("<p>{value}</p>"));
            }
            prop_assert_eq!(engine.render_count(), renders);
        }
    }

    #[test]
    fn render_substitutes_every_slot(
        pieces in template_strategy(),
        a in any::<i32>(),
        b in "[a-z]{0,5}",
    ) {
        let source = source_of(&pieces);
        let vm = ViewModel::new(source.as_str())
            .with_data("a", a)
            .with_data("b", b.as_str());
        let (host, engine) = mount(vm);

        let expected: String = pieces
            .iter()
            .map(|p| match p {
                Piece::Text(t) => t.clone(),
                Piece::Slot("a") => a.to_string(),
                Piece::Slot("b") => b.clone(),
                Piece::Slot(_) => "undefined".to_owned(),
            })
            .collect();
        let slots = pieces.iter().filter(|p| matches!(p, Piece::Slot(_))).count();

        prop_assert_eq!(engine.watcher_count(), slots);
        if source.is_empty() {
            prop_assert_eq!(host.write_count(&engine.root()).expect("writes"), 0);
        } else {
            prop_assert_eq!(host.inner_html(&engine.root()).expect("html"), expected);
        }
    }

    #[test]
    fn recompile_is_idempotent_modulo_id(
        pieces in template_strategy(),
        a in any::<i32>(),
    ) {
        let source = format!(r#"<b @click="m">{}</b>"#, source_of(&pieces));
        let vm = ViewModel::new(source.as_str()).with_data("a", a);
        let (_host, engine) = mount(vm);

        let first = engine.markup();
        engine.recompile().expect("recompile");
        let second = engine.markup();
        prop_assert_eq!(first.replacen("id=p1", "id=*", 1), second.replacen("id=p2", "id=*", 1));
    }

    #[test]
    fn each_render_adds_one_binding(values in proptest::collection::vec(1u32..1000, 0..10)) {
        let vm = ViewModel::new(r#"<b @click="m">{{n}}</b>"#).with_data("n", 0);
        let (_host, engine) = mount(vm);
        for v in &values {
            engine.data().set("n", *v).expect("write");
        }
        let renders = engine.render_count();
        prop_assert_eq!(renders, 1 + values.len() as u64);
        prop_assert_eq!(engine.bindings().len() as u64, renders);
        prop_assert_eq!(engine.bound_event_types().len(), 1);
    }
}
