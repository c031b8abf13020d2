use anyhow::{Context, bail};
use std::str::FromStr;
use wayfarer_input::Key;

/// Keys held together for a number of ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub keys: Vec<Key>,
    pub ticks: u64,
}

/// A key script such as `w:30,w+shift:20,idle:10`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    pub segments: Vec<Segment>,
}

impl Script {
    pub fn total_ticks(&self) -> u64 {
        self.segments.iter().map(|s| s.ticks).sum()
    }
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let mut segments = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((keys, ticks)) = part.rsplit_once(':') else {
                bail!("segment '{part}' is missing ':ticks'");
            };
            let ticks: u64 = ticks
                .trim()
                .parse()
                .with_context(|| format!("bad tick count in segment '{part}'"))?;
            let keys = match keys.trim() {
                "idle" | "" => Vec::new(),
                list => list
                    .split('+')
                    .map(|k| k.parse::<Key>())
                    .collect::<Result<Vec<_>, _>>()
                    .with_context(|| format!("bad key in segment '{part}'"))?,
            };
            segments.push(Segment { keys, ticks });
        }
        Ok(Self { segments })
    }
}
