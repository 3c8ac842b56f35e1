//! Muncher Engine Demo
//!
//! Headless scripted session exercising all three control modalities:
//! a keyboard run, voice lifecycle commands, pose gestures and the pose
//! proximity safety exit. Useful as an integration smoke test and as a
//! reference for embedding the engine.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use muncher::control::pose::{self, Keypoint, KeypointKind};
use muncher::game::events::GameEventData;
use muncher::{
    ControlEvent, EngineConfig, GameSession, Key, Modality, PoseSnapshot, Vec2, TICK_RATE, VERSION,
};

/// Milliseconds per simulated frame.
const MS_PER_TICK: u64 = 1000 / TICK_RATE as u64;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Muncher Engine v{}", VERSION);
    info!("Tick rate: {} Hz", TICK_RATE);

    demo_session()
}

/// Build a face snapshot centered at `center` with ears spanning 4x `radius`.
fn face_snapshot(center: Vec2, radius: f32) -> PoseSnapshot {
    let kp = |kind, dx: f32| Keypoint {
        kind,
        position: Vec2::new(center.x + dx, center.y),
        score: 0.9,
    };
    PoseSnapshot {
        score: 0.9,
        keypoints: vec![
            kp(KeypointKind::Nose, 0.0),
            kp(KeypointKind::LeftEye, -10.0),
            kp(KeypointKind::RightEye, 10.0),
            kp(KeypointKind::LeftEar, -2.0 * radius),
            kp(KeypointKind::RightEar, 2.0 * radius),
        ],
    }
}

fn demo_session() -> Result<()> {
    info!("=== Starting Demo Session ===");

    let mut session = GameSession::with_null_capture(EngineConfig::default(), 12345);
    let sender = session.control_sender();

    session.toggle_play();

    // Keyboard: agent faces right; the same-direction key starts motion
    sender.post(ControlEvent::key(0, Key::ArrowRight));

    let mut total_events = 0;
    let mut consumed = 0;

    for tick in 0u64..1200 {
        let now_ms = tick * MS_PER_TICK;

        match tick {
            // Steer with the keyboard for the first stretch
            120 => sender.post(ControlEvent::key(now_ms, Key::ArrowDown)),
            240 => sender.post(ControlEvent::key(now_ms, Key::ArrowLeft)),

            // Hand control to voice: pause, resume, steer, then stop in place
            360 => {
                session.activate_modality(Modality::Voice)?;
                sender.post(ControlEvent::transcript(now_ms, "pause"));
            }
            420 => sender.post(ControlEvent::transcript(now_ms, "继续")),
            480 => sender.post(ControlEvent::transcript(now_ms, "up")),
            600 => sender.post(ControlEvent::transcript(now_ms, "停")),

            // Hand control to pose: steer with head gestures
            660 => session.activate_modality(Modality::Pose)?,
            _ => {}
        }

        // Pose collaborator: deliver a detection whenever one is due
        if session.active_modality() == Modality::Pose && session.pose_detection_due(now_ms) {
            let snapshot = if tick < 900 {
                // Alternate between center and an off-center glance
                if (tick / 120) % 2 == 0 {
                    face_snapshot(pose::FRAME_CENTER, 60.0)
                } else {
                    face_snapshot(Vec2::new(pose::FRAME_CENTER.x - 100.0, pose::FRAME_CENTER.y), 60.0)
                }
            } else {
                // Subject drifts too far away; the safety exit takes over
                face_snapshot(pose::FRAME_CENTER, 30.0)
            };
            sender.post(ControlEvent::pose_snapshot(now_ms, snapshot));
        }

        let result = session.tick();
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::TargetConsumed { remaining, .. } => {
                    consumed += 1;
                    if remaining % 10 == 0 {
                        info!("{} targets remaining", remaining);
                    }
                }
                GameEventData::PhaseChanged { from, to } => {
                    info!(?from, ?to, "phase changed");
                }
                GameEventData::ModalityChanged { from, to } => {
                    info!(?from, ?to, "modality changed");
                }
                GameEventData::VictoryAchieved => {
                    info!("victory at tick {}", event.tick);
                }
                _ => {}
            }
        }

        if result.victory {
            break;
        }
    }

    info!("=== Session Summary ===");
    info!("Total events: {}", total_events);
    info!("Targets consumed: {}", consumed);
    info!("Active modality: {:?}", session.active_modality());

    let snapshot = session.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
