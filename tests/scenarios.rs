//! End-to-end scenarios through the public API.
//!
//! Each test mounts a tree onto an in-memory raster surface and observes it
//! through element refs, surface pixels and effect logs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_canvas::layout::LayoutRects;
use spark_canvas::renderer::RasterSurface;
use spark_canvas::types::{Dimension, Display, Edges, Rect, Rgba};
use spark_canvas::{
    BoxProps, ElementHandle, MountHandle, MountOptions, Node, PropValue, Ref, box_primitive,
    component, create_effect, create_memo, create_ref, dynamic, mount, on_cleanup, signal,
};

// ── Helpers ─────────────────────────────────────────────────────────────

fn mount_app(app: impl Fn() -> Node + 'static) -> (MountHandle, RasterSurface) {
    let surface = RasterSurface::new(64, 64);
    let handle = mount(surface.clone(), app, MountOptions::default()).expect("mount");
    (handle, surface)
}

fn sized(
    display: Display,
    width: impl Into<PropValue<Dimension>>,
    height: impl Into<PropValue<Dimension>>,
    node_ref: &Ref<ElementHandle>,
) -> BoxProps {
    BoxProps {
        display: display.into(),
        width: width.into(),
        height: height.into(),
        node_ref: Some(node_ref.clone()),
        ..Default::default()
    }
}

fn rects(node_ref: &Ref<ElementHandle>) -> LayoutRects {
    node_ref
        .get()
        .and_then(|handle| handle.rects())
        .expect("element is mounted")
}

fn outer(node_ref: &Ref<ElementHandle>) -> (f64, f64, f64, f64) {
    let r = rects(node_ref).outer;
    (r.x, r.y, r.width, r.height)
}

// ── Layout ──────────────────────────────────────────────────────────────

#[test]
fn block_children_stack_vertically() {
    let refs: Vec<Ref<ElementHandle>> = (0..2).map(|_| create_ref()).collect();
    let r = refs.clone();
    let (_handle, _) = mount_app(move || {
        box_primitive(BoxProps {
            children: vec![
                box_primitive(sized(Display::Block, 100, 50, &r[0])),
                box_primitive(sized(Display::Block, 150, 100, &r[1])),
            ],
            ..sized(Display::Block, 300, 300, &create_ref())
        })
    });

    assert_eq!(outer(&refs[0]), (0.0, 0.0, 100.0, 50.0));
    assert_eq!(outer(&refs[1]), (0.0, 50.0, 150.0, 100.0));
}

#[test]
fn inline_children_wrap_on_overflow() {
    let refs: Vec<Ref<ElementHandle>> = (0..4).map(|_| create_ref()).collect();
    let r = refs.clone();
    let (_handle, _) = mount_app(move || {
        let widths = [100, 150, 100, 300];
        let heights = [50, 100, 50, 200];
        let children = (0..4)
            .map(|i| box_primitive(sized(Display::InlineBlock, widths[i], heights[i], &r[i])))
            .collect();
        box_primitive(BoxProps {
            children,
            ..sized(Display::InlineBlock, 300, 300, &create_ref())
        })
    });

    assert_eq!(outer(&refs[0]), (0.0, 0.0, 100.0, 50.0));
    assert_eq!(outer(&refs[1]), (100.0, 0.0, 150.0, 100.0));
    assert_eq!(outer(&refs[2]), (0.0, 100.0, 100.0, 50.0));
    assert_eq!(outer(&refs[3]), (0.0, 150.0, 300.0, 200.0));
}

#[test]
fn intrinsic_container_wraps_children() {
    let container = create_ref();
    let c = container.clone();
    let (_handle, _) = mount_app(move || {
        box_primitive(BoxProps {
            children: vec![
                box_primitive(sized(Display::InlineBlock, 50, Dimension::Fill, &create_ref())),
                box_primitive(sized(Display::InlineBlock, Dimension::Fill, 100, &create_ref())),
                box_primitive(sized(Display::InlineBlock, 100, 200, &create_ref())),
                box_primitive(sized(Display::Block, Dimension::Fill, 200, &create_ref())),
            ],
            ..sized(Display::InlineBlock, Dimension::Intrinsic, Dimension::Intrinsic, &c)
        })
    });

    assert_eq!(outer(&container), (0.0, 0.0, 100.0, 500.0));
}

#[test]
fn margins_and_paddings_shrink_inner_rects() {
    let with_margin = create_ref();
    let with_padding = create_ref();
    let (m, p) = (with_margin.clone(), with_padding.clone());
    let (_handle, _) = mount_app(move || {
        let m = m.clone();
        let p = p.clone();
        component(move || {
            box_primitive(BoxProps {
                children: vec![
                    box_primitive(BoxProps {
                        margin: Edges::all(20.0).into(),
                        ..sized(Display::Block, 200, 200, &m)
                    }),
                    box_primitive(BoxProps {
                        padding: Edges::all(20.0).into(),
                        ..sized(Display::Block, 200, 200, &p)
                    }),
                ],
                ..sized(Display::Block, 200, 400, &create_ref())
            })
        })
    });

    let margin = rects(&with_margin);
    assert_eq!(margin.client, Rect::new(20.0, 20.0, 160.0, 160.0));
    assert_eq!(margin.content, Rect::new(20.0, 20.0, 160.0, 160.0));

    let padding = rects(&with_padding);
    assert_eq!(padding.outer, Rect::new(0.0, 200.0, 200.0, 200.0));
    assert_eq!(padding.content, Rect::new(20.0, 220.0, 160.0, 160.0));
}

#[test]
fn percent_dimensions_parse_and_resolve() {
    let child = create_ref();
    let c = child.clone();
    let (_handle, _) = mount_app(move || {
        let half: Dimension = "50%".parse().expect("valid dimension");
        let fill: Dimension = "fill".parse().expect("valid dimension");
        box_primitive(BoxProps {
            children: vec![box_primitive(sized(Display::Block, half, fill, &c))],
            ..sized(Display::Block, 200, 100, &create_ref())
        })
    });

    assert_eq!(outer(&child), (0.0, 0.0, 100.0, 100.0));
}

// ── Reactivity ──────────────────────────────────────────────────────────

#[test]
fn store_write_reruns_only_its_effect() {
    let value = signal(0);
    let runs = Rc::new(RefCell::new(Vec::<&'static str>::new()));

    let (v, log) = (value.clone(), runs.clone());
    let (_handle, _) = mount_app(move || {
        let (v, log) = (v.clone(), log.clone());
        component(move || {
            let reader = (v.clone(), log.clone());
            create_effect(move || {
                reader.0.get();
                reader.1.borrow_mut().push("reader");
                let log = reader.1.clone();
                on_cleanup(move || log.borrow_mut().push("reader cleanup"));
            });

            let log = log.clone();
            component(move || {
                let log = log.clone();
                create_effect(move || log.borrow_mut().push("bystander"));
                Node::EMPTY
            })
        })
    });

    assert_eq!(*runs.borrow(), vec!["reader", "bystander"]);
    value.set(1).expect("write");
    assert_eq!(*runs.borrow(), vec!["reader", "bystander", "reader cleanup", "reader"]);

    // Equal writes are short-circuited.
    value.set(1).expect("write");
    assert_eq!(runs.borrow().len(), 4);
}

#[test]
fn prop_signal_relayouts_without_render() {
    let width = signal(Dimension::Fixed(10.0));
    let node_ref = create_ref();
    let (w, r) = (width.clone(), node_ref.clone());
    let (_handle, _) = mount_app(move || box_primitive(sized(Display::Block, w.clone(), 10, &r)));

    assert_eq!(outer(&node_ref).2, 10.0);
    width.set(Dimension::Fixed(42.0)).expect("write");
    assert_eq!(outer(&node_ref).2, 42.0);
}

#[test]
fn dynamic_contents_swap_on_write() {
    let red = signal(true);
    let (flag, cleanups) = (red.clone(), Rc::new(Cell::new(0)));
    let counter = cleanups.clone();
    let (handle, surface) = mount_app(move || {
        let (flag, counter) = (flag.clone(), counter.clone());
        dynamic(move || {
            let color = if flag.get() { Rgba::RED } else { Rgba::BLUE };
            let counter = counter.clone();
            component(move || {
                let counter = counter.clone();
                on_cleanup(move || counter.set(counter.get() + 1));
                box_primitive(BoxProps {
                    width: 8.into(),
                    height: 8.into(),
                    fill_style: Some(color.into()),
                    ..Default::default()
                })
            })
        })
    });
    assert_eq!(surface.pixel(4, 4), Some(Rgba::RED));

    red.set(false).expect("write");
    assert_eq!(cleanups.get(), 1);
    handle.render().expect("render");
    assert_eq!(surface.pixel(4, 4), Some(Rgba::BLUE));
    assert_eq!(surface.pixel(9, 9), Some(Rgba::TRANSPARENT));
}

#[test]
fn memo_only_changes_on_inequality() {
    let value = signal(3);
    let parity = {
        let value = value.clone();
        create_memo(move |_| value.get() % 2)
    };
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (p, log) = (parity.clone(), seen.clone());
    spark_canvas::create_computed(move || log.borrow_mut().push(p.get()));

    value.set(5).expect("write");
    value.set(6).expect("write");
    value.set(8).expect("write");
    assert_eq!(*seen.borrow(), vec![1, 0]);
}

#[test]
fn detached_computation_never_runs_again() {
    let value = signal(0);
    let runs = Rc::new(Cell::new(0));
    let memo = {
        let (value, runs) = (value.clone(), runs.clone());
        create_memo(move |_| {
            runs.set(runs.get() + 1);
            value.get()
        })
    };
    memo.computation().detach();

    for i in 1..5 {
        value.set(i).expect("write");
    }
    assert_eq!(runs.get(), 1);
    assert_eq!(value.subscriber_count(), 0);
}

#[test]
fn unmount_then_remount_is_clean() {
    let surface = RasterSurface::new(4, 4);
    let app = || {
        box_primitive(BoxProps {
            width: 4.into(),
            height: 4.into(),
            fill_style: Some(Rgba::GREEN.into()),
            ..Default::default()
        })
    };

    let handle = mount(surface.clone(), app, MountOptions::default()).expect("mount");
    handle.unmount();
    assert_eq!(spark_canvas::engine::node_count(), 0);

    let handle = mount(surface.clone(), app, MountOptions::default()).expect("mount");
    assert_eq!(surface.pixel(3, 3), Some(Rgba::GREEN));
    drop(handle);
}
