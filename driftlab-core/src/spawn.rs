//! Particle creation: a single particle or a fan of particles with one
//! parameter interpolated across a range.
//!
//! Spawns also have a textual form, used by the command panel and the CLI:
//!
//! ```text
//! single x y heading velocity
//! line   n x1 y1 x2 y2 heading velocity
//! arc    n x y heading1 heading2 velocity
//! speeds n x y heading velocity1 velocity2
//! ```

use crate::error::{SimError, SpawnParseError};
use crate::particle::Particle;
use glam::DVec2;
use std::fmt;
use std::str::FromStr;

/// Largest number of particles a single fan may add
pub const MAX_FAN_COUNT: usize = 10_000;

/// Which parameter a fan interpolates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanKind {
    Linear,
    Angular,
    Velocity,
}

impl fmt::Display for FanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanKind::Linear => write!(f, "linear"),
            FanKind::Angular => write!(f, "angular"),
            FanKind::Velocity => write!(f, "velocity"),
        }
    }
}

/// A request to add one or more particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawn {
    Single {
        at: DVec2,
        heading: f64,
        velocity: f64,
    },
    /// `count` particles evenly spaced from `from` to `to`, both included
    LinearFan {
        count: usize,
        from: DVec2,
        to: DVec2,
        heading: f64,
        velocity: f64,
    },
    /// `count` particles at one point, headings from `from_heading` to `to_heading`
    AngularFan {
        count: usize,
        at: DVec2,
        from_heading: f64,
        to_heading: f64,
        velocity: f64,
    },
    /// `count` particles at one point and heading, speeds from `from_velocity` to `to_velocity`
    VelocityFan {
        count: usize,
        at: DVec2,
        heading: f64,
        from_velocity: f64,
        to_velocity: f64,
    },
}

impl Spawn {
    /// Build the particles in insertion order.
    ///
    /// Fans need at least two particles, since both ends of the range are
    /// included, and at most [`MAX_FAN_COUNT`].
    pub fn particles(&self) -> Result<Vec<Particle>, SimError> {
        match *self {
            Spawn::Single {
                at,
                heading,
                velocity,
            } => Ok(vec![Particle::new(at.x, at.y, heading, velocity)]),
            Spawn::LinearFan {
                count,
                from,
                to,
                heading,
                velocity,
            } => {
                let spacing = (to - from) / fan_segments(FanKind::Linear, count)?;
                Ok((0..count)
                    .map(|i| {
                        let pos = from + i as f64 * spacing;
                        Particle::new(pos.x, pos.y, heading, velocity)
                    })
                    .collect())
            }
            Spawn::AngularFan {
                count,
                at,
                from_heading,
                to_heading,
                velocity,
            } => {
                let spacing = (to_heading - from_heading) / fan_segments(FanKind::Angular, count)?;
                Ok((0..count)
                    .map(|i| Particle::new(at.x, at.y, from_heading + i as f64 * spacing, velocity))
                    .collect())
            }
            Spawn::VelocityFan {
                count,
                at,
                heading,
                from_velocity,
                to_velocity,
            } => {
                let spacing =
                    (to_velocity - from_velocity) / fan_segments(FanKind::Velocity, count)?;
                Ok((0..count)
                    .map(|i| Particle::new(at.x, at.y, heading, from_velocity + i as f64 * spacing))
                    .collect())
            }
        }
    }

    /// Number of particles this spawn adds
    pub fn count(&self) -> usize {
        match *self {
            Spawn::Single { .. } => 1,
            Spawn::LinearFan { count, .. }
            | Spawn::AngularFan { count, .. }
            | Spawn::VelocityFan { count, .. } => count,
        }
    }
}

/// Number of gaps between fan members, `count - 1`
fn fan_segments(fan: FanKind, count: usize) -> Result<f64, SimError> {
    if count < 2 {
        return Err(SimError::InvalidFanCount { fan, count });
    }
    if count > MAX_FAN_COUNT {
        return Err(SimError::FanTooLarge {
            fan,
            count,
            max: MAX_FAN_COUNT,
        });
    }
    Ok((count - 1) as f64)
}

impl fmt::Display for Spawn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Spawn::Single {
                at,
                heading,
                velocity,
            } => write!(f, "single {} {} {} {}", at.x, at.y, heading, velocity),
            Spawn::LinearFan {
                count,
                from,
                to,
                heading,
                velocity,
            } => write!(
                f,
                "line {} {} {} {} {} {} {}",
                count, from.x, from.y, to.x, to.y, heading, velocity
            ),
            Spawn::AngularFan {
                count,
                at,
                from_heading,
                to_heading,
                velocity,
            } => write!(
                f,
                "arc {} {} {} {} {} {}",
                count, at.x, at.y, from_heading, to_heading, velocity
            ),
            Spawn::VelocityFan {
                count,
                at,
                heading,
                from_velocity,
                to_velocity,
            } => write!(
                f,
                "speeds {} {} {} {} {} {}",
                count, at.x, at.y, heading, from_velocity, to_velocity
            ),
        }
    }
}

impl FromStr for Spawn {
    type Err = SpawnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty());
        let kind = tokens.next().ok_or(SpawnParseError::Empty)?.to_ascii_lowercase();
        let args: Vec<&str> = tokens.collect();

        match kind.as_str() {
            "single" => {
                let [x, y, heading, velocity] = numbers::<4>("single", &args)?;
                Ok(Spawn::Single {
                    at: DVec2::new(x, y),
                    heading,
                    velocity,
                })
            }
            "line" => {
                let count = parse_count("line", 7, &args)?;
                let [x1, y1, x2, y2, heading, velocity] = numbers::<6>("line", &args[1..])?;
                Ok(Spawn::LinearFan {
                    count,
                    from: DVec2::new(x1, y1),
                    to: DVec2::new(x2, y2),
                    heading,
                    velocity,
                })
            }
            "arc" => {
                let count = parse_count("arc", 6, &args)?;
                let [x, y, from_heading, to_heading, velocity] = numbers::<5>("arc", &args[1..])?;
                Ok(Spawn::AngularFan {
                    count,
                    at: DVec2::new(x, y),
                    from_heading,
                    to_heading,
                    velocity,
                })
            }
            "speeds" => {
                let count = parse_count("speeds", 6, &args)?;
                let [x, y, heading, from_velocity, to_velocity] =
                    numbers::<5>("speeds", &args[1..])?;
                Ok(Spawn::VelocityFan {
                    count,
                    at: DVec2::new(x, y),
                    heading,
                    from_velocity,
                    to_velocity,
                })
            }
            _ => Err(SpawnParseError::UnknownKind(kind)),
        }
    }
}

/// Check the total arity of a fan command and parse its leading count
fn parse_count(
    kind: &'static str,
    expected: usize,
    args: &[&str],
) -> Result<usize, SpawnParseError> {
    if args.len() != expected {
        return Err(SpawnParseError::Arity {
            kind,
            expected,
            found: args.len(),
        });
    }
    let count: usize = args[0]
        .parse()
        .map_err(|_| SpawnParseError::InvalidCount(args[0].to_string()))?;
    if count > MAX_FAN_COUNT {
        return Err(SpawnParseError::CountTooLarge {
            count,
            max: MAX_FAN_COUNT,
        });
    }
    Ok(count)
}

fn numbers<const N: usize>(kind: &'static str, args: &[&str]) -> Result<[f64; N], SpawnParseError> {
    if args.len() != N {
        return Err(SpawnParseError::Arity {
            kind,
            expected: N,
            found: args.len(),
        });
    }

    let mut values = [0.0; N];
    for (value, arg) in values.iter_mut().zip(args) {
        let parsed: f64 = arg
            .parse()
            .map_err(|_| SpawnParseError::InvalidNumber(arg.to_string()))?;
        if !parsed.is_finite() {
            return Err(SpawnParseError::NotFinite(arg.to_string()));
        }
        *value = parsed;
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let spawn: Spawn = "single 10 20 0.5 3".parse().unwrap();
        assert_eq!(
            spawn,
            Spawn::Single {
                at: DVec2::new(10.0, 20.0),
                heading: 0.5,
                velocity: 3.0,
            }
        );
    }

    #[test]
    fn test_parse_accepts_commas_and_case() {
        let spawn: Spawn = "LINE 5, 0,0, 4,0, 0, 1".parse().unwrap();
        assert_eq!(
            spawn,
            Spawn::LinearFan {
                count: 5,
                from: DVec2::ZERO,
                to: DVec2::new(4.0, 0.0),
                heading: 0.0,
                velocity: 1.0,
            }
        );
    }

    #[test]
    fn test_parse_arc_and_speeds() {
        let arc: Spawn = "arc 3 1 2 0 3 4".parse().unwrap();
        assert!(matches!(arc, Spawn::AngularFan { count: 3, velocity, .. } if velocity == 4.0));

        let speeds: Spawn = "speeds 2 1 2 0.25 1 5".parse().unwrap();
        assert!(matches!(
            speeds,
            Spawn::VelocityFan { count: 2, from_velocity, to_velocity, .. }
                if from_velocity == 1.0 && to_velocity == 5.0
        ));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Spawn>(), Err(SpawnParseError::Empty));
        assert_eq!(
            "burst 1 2".parse::<Spawn>(),
            Err(SpawnParseError::UnknownKind("burst".to_string()))
        );
        assert_eq!(
            "single 1 2 3".parse::<Spawn>(),
            Err(SpawnParseError::Arity {
                kind: "single",
                expected: 4,
                found: 3,
            })
        );
        assert_eq!(
            "line -2 0 0 1 1 0 1".parse::<Spawn>(),
            Err(SpawnParseError::InvalidCount("-2".to_string()))
        );
        assert_eq!(
            "single 1 two 3 4".parse::<Spawn>(),
            Err(SpawnParseError::InvalidNumber("two".to_string()))
        );
        assert_eq!(
            "single 1 inf 3 4".parse::<Spawn>(),
            Err(SpawnParseError::NotFinite("inf".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_oversized_fans() {
        for command in [
            "line 18446744073709551615 0 0 1 1 0 1",
            "arc 10001 0 0 0 1 1",
            "speeds 99999999 0 0 0 1 2",
        ] {
            assert!(
                matches!(
                    command.parse::<Spawn>(),
                    Err(SpawnParseError::CountTooLarge { max: MAX_FAN_COUNT, .. })
                ),
                "{} should be rejected",
                command
            );
        }

        let at_limit: Spawn = format!("line {} 0 0 1 1 0 1", MAX_FAN_COUNT).parse().unwrap();
        assert_eq!(at_limit.count(), MAX_FAN_COUNT);
    }

    #[test]
    fn test_oversized_fan_value_is_rejected_before_allocating() {
        let spawn = Spawn::LinearFan {
            count: usize::MAX,
            from: DVec2::ZERO,
            to: DVec2::ONE,
            heading: 0.0,
            velocity: 1.0,
        };
        assert!(matches!(
            spawn.particles(),
            Err(SimError::FanTooLarge {
                fan: FanKind::Linear,
                count: usize::MAX,
                max: MAX_FAN_COUNT,
            })
        ));
    }

    #[test]
    fn test_display_matches_command_syntax() {
        let spawn = Spawn::AngularFan {
            count: 4,
            at: DVec2::new(100.0, 50.5),
            from_heading: 0.0,
            to_heading: 1.5,
            velocity: 2.0,
        };
        assert_eq!(spawn.to_string(), "arc 4 100 50.5 0 1.5 2");
        assert_eq!(spawn.to_string().parse::<Spawn>(), Ok(spawn));
    }

    #[test]
    fn test_single_fan_member_is_rejected() {
        let spawn = Spawn::VelocityFan {
            count: 1,
            at: DVec2::ZERO,
            heading: 0.0,
            from_velocity: 1.0,
            to_velocity: 2.0,
        };
        assert!(matches!(
            spawn.particles(),
            Err(SimError::InvalidFanCount {
                fan: FanKind::Velocity,
                count: 1
            })
        ));
    }
}
