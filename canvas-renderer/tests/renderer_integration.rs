//! Integration tests for the frame driver.
//!
//! These tests run an editor through the renderer with the headless backend
//! and inspect the recorded frames.

use canvas_core::{
    DrawCommand, Editor, EditorConfig, Item, MouseButton, PointerEvent, Transform2, Vec2,
};
use canvas_renderer::{BackendType, HeadlessBackend, RenderError, Renderer, RendererConfig};

fn editor_with_items() -> Editor {
    let mut editor = Editor::new(EditorConfig::default()).expect("valid config");
    editor.set_viewport(800.0, 600.0, 1.0, Vec2::zero());
    editor.center_origin();
    editor.add_item(Item::new(Vec2::zero(), Vec2::uniform(20.0)));
    editor.add_item(Item::new(Vec2::new(10.0, 0.0), Vec2::uniform(20.0)));
    editor.add_item(Item::new(Vec2::new(-150.0, 80.0), Vec2::uniform(30.0)));
    editor
}

fn headless() -> Renderer {
    Renderer::new(RendererConfig {
        preferred_backend: BackendType::Headless,
        ..RendererConfig::default()
    })
    .expect("headless backend")
}

#[test]
fn integration_canvas2d_falls_back_to_headless() {
    let renderer = Renderer::new(RendererConfig::default()).expect("fallback");
    assert_eq!(renderer.active_backend(), BackendType::Headless);
}

#[test]
fn integration_canvas2d_without_fallback_has_no_backend() {
    let result = Renderer::new(RendererConfig {
        allow_fallback: false,
        ..RendererConfig::default()
    });
    assert!(matches!(result, Err(RenderError::NoBackend(_))));

    let renderer = Renderer::new(RendererConfig {
        preferred_backend: BackendType::Headless,
        allow_fallback: false,
        ..RendererConfig::default()
    })
    .expect("headless needs no fallback");
    assert_eq!(renderer.active_backend(), BackendType::Headless);
}

#[test]
fn integration_frames_are_counted_and_recorded() {
    let editor = editor_with_items();
    let mut renderer = headless();

    let stats = renderer.render(&editor).expect("frame");
    assert_eq!(stats.items_drawn, 3);
    assert_eq!(stats.colliding_items, 2);
    renderer.render(&editor).expect("frame");
    assert_eq!(renderer.frame_count(), 2);
    assert_eq!(renderer.last_stats(), stats);

    let frame = renderer.backend().last_frame().expect("headless records");
    assert!(matches!(frame.first(), Some(DrawCommand::SetTransform { transform }) if *transform == Transform2::IDENTITY));
    assert!(frame.iter().any(|c| matches!(c, DrawCommand::FillText { .. })));
}

#[test]
fn integration_pan_shows_up_in_next_frame() {
    let mut editor = editor_with_items();
    let mut renderer = headless();
    renderer.render(&editor).expect("frame");

    editor.handle_event(PointerEvent::Down {
        client: Vec2::new(10.0, 10.0),
        button: MouseButton::Secondary,
    });
    editor.handle_event(PointerEvent::Move {
        client: Vec2::new(60.0, 30.0),
        movement: Vec2::new(50.0, 20.0),
    });
    renderer.render(&editor).expect("frame");

    let frame = renderer.backend().last_frame().expect("headless records");
    let expected = Transform2::scale_translate(1.0, Vec2::new(450.0, 320.0));
    assert!(frame.contains(&DrawCommand::SetTransform {
        transform: expected
    }));
}

#[test]
fn integration_resize_validates() {
    let mut renderer = headless();
    assert!(matches!(
        renderer.resize(0, 600),
        Err(RenderError::Surface(_))
    ));
    renderer.resize(1280, 720).expect("resize");
    assert_eq!(renderer.config().width, 1280);
}

#[test]
fn integration_custom_backend() {
    let renderer = Renderer::with_backend(
        RendererConfig {
            width: 320,
            height: 240,
            ..RendererConfig::default()
        },
        Box::new(HeadlessBackend::new()),
    )
    .expect("backend");
    assert_eq!(renderer.active_backend(), BackendType::Headless);
    assert_eq!(renderer.frame_count(), 0);
}

#[test]
fn integration_config_from_json() {
    let config: RendererConfig =
        serde_json::from_str(r#"{ "preferred_backend": "headless", "width": 640 }"#)
            .expect("config");
    assert_eq!(config.preferred_backend, BackendType::Headless);
    assert_eq!(config.width, 640);
    assert_eq!(config.height, 600);
    assert!(config.allow_fallback);
    let renderer = Renderer::new(config).expect("headless");
    assert_eq!(renderer.active_backend(), BackendType::Headless);
}
