use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use glam::Vec3;
use locomotion::{
    CharacterTransform, GaitState, LocomotionAnimator, LocomotionCharacter, LocomotionConfig,
    MovementSource,
};

const ACCELERATION: f32 = 8.0;
const BRAKING: f32 = 12.0;

#[derive(Debug, Clone)]
struct SimConfig {
    config_path: Option<PathBuf>,
    fps: f32,
}

/// One scripted stretch of input held for `seconds`.
struct Segment {
    label: &'static str,
    seconds: f32,
    input: Vec3,
    max_speed: f32,
    crouch: bool,
    airborne: bool,
}

const SCRIPT: &[Segment] = &[
    Segment {
        label: "stand",
        seconds: 0.5,
        input: Vec3::ZERO,
        max_speed: 1.6,
        crouch: false,
        airborne: false,
    },
    Segment {
        label: "walk left",
        seconds: 1.5,
        input: Vec3::NEG_X,
        max_speed: 1.6,
        crouch: false,
        airborne: false,
    },
    Segment {
        label: "jog left",
        seconds: 2.0,
        input: Vec3::NEG_X,
        max_speed: 4.0,
        crouch: false,
        airborne: false,
    },
    Segment {
        label: "jog turn",
        seconds: 1.0,
        input: Vec3::NEG_Z,
        max_speed: 4.0,
        crouch: false,
        airborne: false,
    },
    Segment {
        label: "release",
        seconds: 1.0,
        input: Vec3::ZERO,
        max_speed: 4.0,
        crouch: false,
        airborne: false,
    },
    Segment {
        label: "crouch walk back",
        seconds: 1.5,
        input: Vec3::Z,
        max_speed: 1.0,
        crouch: true,
        airborne: false,
    },
    Segment {
        label: "crouch stop",
        seconds: 0.75,
        input: Vec3::ZERO,
        max_speed: 1.0,
        crouch: true,
        airborne: false,
    },
    Segment {
        label: "jump",
        seconds: 0.6,
        input: Vec3::NEG_Z,
        max_speed: 1.6,
        crouch: false,
        airborne: true,
    },
    Segment {
        label: "land and walk",
        seconds: 1.0,
        input: Vec3::NEG_Z,
        max_speed: 1.6,
        crouch: false,
        airborne: false,
    },
];

#[derive(Debug, Default)]
struct SimCharacter {
    velocity: Vec3,
    acceleration: Vec3,
    max_speed: f32,
    falling: bool,
    crouching: bool,
    input: Vec3,
    yaw: f32,
}

impl SimCharacter {
    fn step(&mut self, segment: &Segment, dt: f32) {
        self.input = segment.input;
        self.max_speed = segment.max_speed;
        self.crouching = segment.crouch;
        self.falling = segment.airborne;

        let desired = segment.input * segment.max_speed;
        let gap = desired - self.velocity;
        let rate = if segment.input == Vec3::ZERO {
            BRAKING
        } else {
            ACCELERATION
        };

        self.acceleration = gap.normalize_or_zero() * rate;
        if gap.length() <= rate * dt {
            self.velocity = desired;
        } else {
            self.velocity += self.acceleration * dt;
        }
    }
}

impl MovementSource for SimCharacter {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }
    fn current_acceleration(&self) -> Vec3 {
        self.acceleration
    }
    fn max_speed(&self) -> f32 {
        self.max_speed
    }
    fn is_falling(&self) -> bool {
        self.falling
    }
    fn is_crouching(&self) -> bool {
        self.crouching
    }
    fn last_input_vector(&self) -> Vec3 {
        self.input
    }
}

impl LocomotionCharacter for SimCharacter {
    fn movement(&self) -> &dyn MovementSource {
        self
    }
    fn world_yaw(&self) -> f32 {
        self.yaw
    }
}

impl CharacterTransform for SimCharacter {
    fn world_yaw(&self) -> f32 {
        self.yaw
    }
    fn set_world_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cfg = parse_args()?;
    let config = match &cfg.config_path {
        Some(path) => LocomotionConfig::load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => LocomotionConfig::default(),
    };

    log::info!(
        "locomotion-sim {} at {} fps",
        locomotion::locomotion_version(),
        cfg.fps
    );

    // Authored root speeds of the clip families.
    let walk_speed = config.thresholds.walk.min_ground_speed.max(1.5);
    let jog_speed = config.thresholds.jog.min_ground_speed.max(4.0);

    let mut animator = LocomotionAnimator::new(config);
    let mut character = SimCharacter::default();
    let mut curves: HashMap<String, f32> = HashMap::new();
    let speed_curve = animator.config().curves.speed.clone();
    curves.insert(speed_curve.clone(), 0.0);
    let dt = 1.0 / cfg.fps;
    let mut elapsed = 0.0_f32;

    for segment in SCRIPT {
        log::info!("[{elapsed:6.2}s] segment '{}'", segment.label);

        let frames = (segment.seconds * cfg.fps).round() as u32;
        for _ in 0..frames {
            character.step(segment, dt);

            let authored = match animator.gait() {
                GaitState::Jog => jog_speed,
                GaitState::Walk | GaitState::Crouch => walk_speed,
                GaitState::Idle | GaitState::Jump => 0.0,
            };
            if let Some(value) = curves.get_mut(&speed_curve) {
                *value = authored;
            }

            animator.update(Some(&character), &curves, dt);

            let outputs = animator.outputs();
            if outputs.gait != outputs.previous_gait {
                log::info!(
                    "[{elapsed:6.2}s] {} -> {} clip={} offset={:.2} start={} transition={}",
                    outputs.previous_gait,
                    outputs.gait,
                    outputs
                        .selection
                        .clip
                        .as_ref()
                        .map_or("-", |clip| clip.name()),
                    outputs.selection.start_time,
                    outputs.selection.play_start_anim,
                    outputs.selection.play_gait_transition_anim,
                );
            }

            animator.post_evaluate(Some(&mut character), &curves);
            elapsed += dt;
        }

        let outputs = animator.outputs();
        log::info!(
            "[{elapsed:6.2}s] gait={} ground_speed={:.2} play_rate={:.2} yaw={:.1}",
            outputs.gait,
            outputs.ground_speed,
            outputs.play_rate,
            character.yaw
        );
    }

    Ok(())
}

fn parse_args() -> anyhow::Result<SimConfig> {
    let mut cfg = SimConfig {
        config_path: None,
        fps: 60.0,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => cfg.config_path = Some(PathBuf::from(next_arg_value(&mut args, &arg)?)),
            "--fps" => {
                let value = next_arg_value(&mut args, &arg)?;
                cfg.fps = value
                    .parse::<f32>()
                    .with_context(|| format!("invalid --fps: {}", value))?;
                if !(cfg.fps.is_finite() && cfg.fps > 0.0) {
                    bail!("--fps must be positive, got {}", value);
                }
            }
            "--help" | "-h" => {
                println!("usage: locomotion-sim [--config <path.yaml>] [--fps <frames per second>]");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(cfg)
}

fn next_arg_value(args: &mut impl Iterator<Item = String>, flag: &str) -> anyhow::Result<String> {
    args.next()
        .with_context(|| format!("missing value for {}", flag))
}
