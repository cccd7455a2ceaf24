// Host-side tests for the ripple simulation and loop control.
// The browser crate is wasm-only, so these drive ripple-core directly.

use glam::Vec2;
use ripple_core::{
    CanvasPoint, HeroEffect, LoopCommand, LoopDecision, PointerKind, RippleConfig, RippleField,
    SoftwareRenderer,
};

fn field(cfg: RippleConfig) -> RippleField {
    RippleField::new(cfg, 11)
}

fn effect() -> HeroEffect<SoftwareRenderer> {
    let mut fx = HeroEffect::new(RippleConfig::default(), SoftwareRenderer::new(1, 1), 5).unwrap();
    assert!(fx.resize(80.0, 40.0, 1.0));
    fx
}

#[test]
fn forced_emission_evicts_oldest_first() {
    let mut f = field(RippleConfig::default());
    let max = f.config().max_points;
    for i in 0..2 * max {
        let pos = Vec2::new(i as f32 / 100.0, 0.5);
        assert!(f.emit(pos, 1.0, PointerKind::Mouse, true));
    }
    assert_eq!(f.len(), max);
    let oldest = f.points().front().unwrap();
    assert!((oldest.position.x - max as f32 / 100.0).abs() < 1e-6);
    let newest = f.points().back().unwrap();
    assert!((newest.position.x - (2 * max - 1) as f32 / 100.0).abs() < 1e-6);
}

#[test]
fn ages_grow_and_expired_points_are_pruned() {
    let mut f = field(RippleConfig::default());
    f.emit(Vec2::splat(0.5), 1.0, PointerKind::Mouse, true);
    f.emit(Vec2::new(0.2, 0.7), 0.4, PointerKind::Touch, true);
    let mut last_ages: Vec<f32> = f.points().iter().map(|p| p.age).collect();
    for _ in 0..400 {
        f.tick(0.016);
        for p in f.points() {
            assert!(p.age < p.life);
        }
        let ages: Vec<f32> = f.points().iter().map(|p| p.age).collect();
        if ages.len() == last_ages.len() {
            for (now, before) in ages.iter().zip(&last_ages) {
                assert!(now >= before);
            }
        }
        last_ages = ages;
    }
    assert!(f.is_empty());
}

#[test]
fn loop_goes_idle_after_settle_frames_and_stays_put() {
    let mut fx = effect();
    assert_eq!(fx.request_start(), LoopCommand::Schedule);
    let settle = fx.config().idle_settle_frames;
    let mut ts = 0.0;
    for i in 1..=settle {
        let decision = fx.frame(ts);
        ts += 16.0;
        if i < settle {
            assert_eq!(decision, LoopDecision::Continue, "frame {i}");
        } else {
            assert_eq!(decision, LoopDecision::Stop);
        }
    }
    let elapsed = fx.clock().elapsed;
    let draws = fx.renderer().draw_count();
    for _ in 0..5 {
        assert_eq!(fx.frame(ts), LoopDecision::Stop);
        ts += 16.0;
    }
    assert_eq!(fx.clock().elapsed, elapsed);
    assert_eq!(fx.renderer().draw_count(), draws);
    assert!(!fx.render_loop().is_running());
}

#[test]
fn spacing_throttles_unforced_emission() {
    let near = {
        let mut f = field(RippleConfig::default());
        f.emit(Vec2::new(0.5, 0.5), 0.5, PointerKind::Mouse, false);
        f.emit(Vec2::new(0.505, 0.5), 0.5, PointerKind::Mouse, false);
        f.len()
    };
    let far = {
        let mut f = field(RippleConfig::default());
        f.emit(Vec2::new(0.5, 0.5), 0.5, PointerKind::Mouse, false);
        f.emit(Vec2::new(0.55, 0.5), 0.5, PointerKind::Mouse, false);
        f.len()
    };
    assert_eq!(near, 1);
    assert_eq!(far, 2);
}

#[test]
fn integration_is_frame_rate_independent() {
    let cfg = RippleConfig {
        max_tick_dt: 0.1,
        min_tick_dt: 0.001,
        ..RippleConfig::default()
    };
    let mut coarse = field(cfg.clone());
    let mut fine = field(cfg);
    for f in [&mut coarse, &mut fine] {
        f.emit(Vec2::new(0.4, 0.6), 1.0, PointerKind::Mouse, true);
    }
    for _ in 0..10 {
        coarse.tick(0.1);
    }
    for _ in 0..100 {
        fine.tick(0.01);
    }
    let (a, b) = (&coarse.points()[0], &fine.points()[0]);
    assert!((a.age - b.age).abs() < 1e-4);
    assert!((a.amplitude - b.amplitude).abs() < 1e-3 * a.amplitude.max(1e-3));
    assert!((a.radius - b.radius).abs() / a.radius < 0.02);
    assert!(a.position.distance(b.position) < 1e-3);
}

#[test]
fn resize_mid_animation_resets_and_sizes_backing() {
    let mut fx = effect();
    let rect = ripple_core::CanvasRect {
        left: 0.0,
        top: 0.0,
        width: 80.0,
        height: 40.0,
    };
    fx.pointer_down(&rect, 40.0, 20.0, PointerKind::Mouse);
    fx.frame(0.0);
    fx.frame(16.0);
    assert!(!fx.field().is_empty());

    assert!(fx.resize(100.4, 50.6, 3.0));
    assert!(fx.field().is_empty());
    assert_eq!(fx.clock().elapsed, 0.0);
    let sizing = fx.sizing();
    assert_eq!((sizing.width, sizing.height), (100.0, 51.0));
    assert_eq!(sizing.dpr, 1.2);
    assert_eq!(fx.renderer().size(), (120, 61));
}

#[test]
fn forced_tap_creates_one_fresh_point() {
    let cfg = RippleConfig::default();
    let mut f = field(cfg.clone());
    let update = f.pointer_down(
        CanvasPoint {
            inside: true,
            pos: Vec2::splat(0.5),
        },
        PointerKind::Mouse,
    );
    assert!(update.inside && update.emitted);
    assert_eq!(f.len(), 1);
    let p = &f.points()[0];
    assert_eq!(p.age, 0.0);
    let half_jitter = cfg.radius_jitter * 0.5 + 1e-6;
    assert!((p.radius - cfg.radius_desktop).abs() <= half_jitter);
    let expected = (cfg.tap_boost * cfg.amplitude_scale).clamp(cfg.amplitude_min, cfg.amplitude_max);
    assert!((p.amplitude - expected).abs() < 1e-6);
    assert!(f.pointer().active);
}

#[test]
fn point_is_gone_after_its_life() {
    let cfg = RippleConfig {
        life_jitter: 0.0,
        ..RippleConfig::default()
    };
    let mut f = field(cfg);
    f.emit(Vec2::splat(0.5), 1.5, PointerKind::Mouse, true);
    assert!((f.points()[0].life - 2.3).abs() < 1e-6);
    let mut t = 0.0;
    while t < 2.5 {
        t += f.tick(0.016);
    }
    assert!(f.is_empty());
}
