//! Where inference runs.
//!
//! Placement never changes embedding values, only the compute unit.
//! `Default` defers to the tensor library's own default location.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::EmbedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DevicePlacement {
    #[default]
    Default,
    Cpu,
    /// CUDA device ordinal.
    Cuda(usize),
    /// Metal device ordinal.
    Metal(usize),
}

impl fmt::Display for DevicePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(n) => write!(f, "cuda:{n}"),
            Self::Metal(n) => write!(f, "metal:{n}"),
        }
    }
}

impl FromStr for DevicePlacement {
    type Err = EmbedError;

    /// `default`, `cpu`, `cuda`, `cuda:1`, `metal`, `metal:0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (kind, ordinal) = match s.split_once(':') {
            Some((kind, n)) => {
                let n = n
                    .parse::<usize>()
                    .map_err(|_| EmbedError::Device(format!("invalid device ordinal in '{s}'")))?;
                (kind.to_string(), n)
            }
            None => (s.clone(), 0),
        };
        match kind.as_str() {
            "default" if !s.contains(':') => Ok(Self::Default),
            "cpu" if !s.contains(':') => Ok(Self::Cpu),
            "cuda" | "gpu" => Ok(Self::Cuda(ordinal)),
            "metal" | "mps" => Ok(Self::Metal(ordinal)),
            _ => Err(EmbedError::Device(format!("unknown device '{s}'"))),
        }
    }
}

impl Serialize for DevicePlacement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DevicePlacement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_devices() {
        assert_eq!("default".parse::<DevicePlacement>().unwrap(), DevicePlacement::Default);
        assert_eq!("CPU".parse::<DevicePlacement>().unwrap(), DevicePlacement::Cpu);
        assert_eq!("cuda".parse::<DevicePlacement>().unwrap(), DevicePlacement::Cuda(0));
        assert_eq!("cuda:2".parse::<DevicePlacement>().unwrap(), DevicePlacement::Cuda(2));
        assert_eq!("metal:0".parse::<DevicePlacement>().unwrap(), DevicePlacement::Metal(0));
    }

    #[test]
    fn rejects_bad_devices() {
        assert!("tpu".parse::<DevicePlacement>().is_err());
        assert!("cuda:x".parse::<DevicePlacement>().is_err());
        assert!("cpu:1".parse::<DevicePlacement>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for p in [
            DevicePlacement::Default,
            DevicePlacement::Cpu,
            DevicePlacement::Cuda(1),
            DevicePlacement::Metal(0),
        ] {
            assert_eq!(p.to_string().parse::<DevicePlacement>().unwrap(), p);
        }
    }
}
