//! Property-based invariant tests for layout and the reactive core.
//!
//! 1. Containment: content lies within client lies within outer.
//! 2. Layout is idempotent.
//! 3. No size is negative.
//! 4. A store write is immediately visible to reads.
//! 5. A memo only notifies when its value changes.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use spark_canvas::layout::{LayoutItem, LayoutProps, LayoutRects, compute_layout};
use spark_canvas::types::{Dimension, Display, Edges, Rect};
use spark_canvas::{create_computed, create_memo, signal};

// ── Helpers ─────────────────────────────────────────────────────────────

fn dimension_strategy() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        (0u16..400).prop_map(|v| Dimension::Fixed(v as f64)),
        (0u16..=100).prop_map(|v| Dimension::Percent(v as f64)),
        Just(Dimension::Fill),
        Just(Dimension::Intrinsic),
    ]
}

fn edges_strategy() -> impl Strategy<Value = Edges> {
    (0u8..40, 0u8..40, 0u8..40, 0u8..40)
        .prop_map(|(t, r, b, l)| Edges::new(t as f64, r as f64, b as f64, l as f64))
}

fn props_strategy() -> impl Strategy<Value = LayoutProps> {
    (
        prop_oneof![Just(Display::Block), Just(Display::InlineBlock)],
        dimension_strategy(),
        dimension_strategy(),
        edges_strategy(),
        edges_strategy(),
    )
        .prop_map(|(display, width, height, margin, padding)| LayoutProps {
            display,
            width,
            height,
            margin,
            padding,
        })
}

fn tree_strategy() -> impl Strategy<Value = LayoutItem<()>> {
    let leaf = props_strategy().prop_map(|props| LayoutItem::new((), props, Vec::new()));
    leaf.prop_recursive(3, 24, 4, |inner| {
        (props_strategy(), proptest::collection::vec(inner, 0..4))
            .prop_map(|(props, children)| LayoutItem::new((), props, children))
    })
}

const EPSILON: f64 = 1e-6;

fn within(outer: &Rect, inner: &Rect) -> bool {
    inner.x >= outer.x - EPSILON
        && inner.y >= outer.y - EPSILON
        && inner.x2() <= outer.x2() + EPSILON
        && inner.y2() <= outer.y2() + EPSILON
}

fn collect(root: &mut LayoutItem<()>) -> Vec<LayoutRects> {
    let mut out = Vec::new();
    compute_layout(root, |_, rects| out.push(*rects));
    out
}

// ── Layout ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn content_within_client_within_outer(mut root in tree_strategy()) {
        for rects in collect(&mut root) {
            prop_assert!(within(&rects.outer, &rects.client), "{rects:?}");
            prop_assert!(within(&rects.client, &rects.content), "{rects:?}");
        }
    }

    #[test]
    fn layout_is_idempotent(mut root in tree_strategy()) {
        let first = collect(&mut root);
        let second = collect(&mut root);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sizes_are_never_negative(mut root in tree_strategy()) {
        for rects in collect(&mut root) {
            for rect in [rects.outer, rects.client, rects.content] {
                prop_assert!(rect.width >= 0.0 && rect.height >= 0.0, "{rect:?}");
            }
        }
    }
}

// ── Reactive core ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn write_then_read(writes in proptest::collection::vec(any::<i32>(), 1..32)) {
        let store = signal(0);
        for value in writes {
            store.set(value).unwrap();
            prop_assert_eq!(store.get(), value);
        }
    }

    #[test]
    fn memo_notifies_only_on_change(writes in proptest::collection::vec(0u8..16, 1..32)) {
        let store = signal(0u8);
        let bucket = {
            let store = store.clone();
            create_memo(move |_| store.get() / 4)
        };
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let (bucket, seen) = (bucket.clone(), seen.clone());
            create_computed(move || seen.borrow_mut().push(bucket.get()));
        }

        let mut expected = vec![0u8];
        for value in writes {
            store.set(value).unwrap();
            let next = value / 4;
            if expected.last() != Some(&next) {
                expected.push(next);
            }
        }
        prop_assert_eq!(&*seen.borrow(), &expected);
    }
}
