//! Wire models for the qBittorrent Web API.

use serde::{Deserialize, Deserializer};

/// Tier value qBittorrent assigns to disabled pseudo-trackers (DHT, PeX, LSD).
pub const DISABLED_TIER: i64 = -1;

/// Health of a single tracker, decoded from the API status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerStatus {
    /// Status 0: the tracker is disabled for this torrent.
    Disabled,
    /// Status 2 or 3: the tracker has been or is being contacted and works.
    Working,
    /// Status 4: the tracker has been contacted and is not working.
    NotWorking,
    /// Any other code, including 1 (not contacted yet).
    Unknown,
}

impl TrackerStatus {
    /// Decode the integer status code used by `/api/v2/torrents/trackers`.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Disabled,
            2 | 3 => Self::Working,
            4 => Self::NotWorking,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for TrackerStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Ok(Self::from_code(code))
    }
}

/// One tracker entry for a torrent.
#[derive(Debug, Clone, Deserialize)]
pub struct Tracker {
    /// Announce URL. Pseudo-trackers use labels like `** [DHT] **`.
    pub url: String,
    /// Tracker tier; `-1` for the pseudo-tracker entries.
    #[serde(default, deserialize_with = "lenient_tier")]
    pub tier: i64,
    /// Decoded health status.
    pub status: TrackerStatus,
    /// Message reported by the tracker, e.g. `torrent not registered`.
    #[serde(default)]
    pub msg: String,
}

impl Tracker {
    /// True for real, non-disabled tracker entries.
    ///
    /// Pseudo-trackers carry tier `-1` and never count towards classification.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.tier != DISABLED_TIER
    }
}

// Older qBittorrent versions serialize the pseudo-tracker tier as "".
fn lenient_tier<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTier {
        Number(i64),
        Text(String),
    }

    Ok(match RawTier::deserialize(deserializer)? {
        RawTier::Number(tier) => tier,
        RawTier::Text(text) => text.trim().parse().unwrap_or(DISABLED_TIER),
    })
}

/// One torrent record in the client snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Torrent {
    /// Info-hash identifying the torrent.
    pub hash: String,
    /// Display name.
    pub name: String,
    /// Total size of the torrent's payload, in bytes.
    #[serde(default)]
    pub size: u64,
    /// Absolute path of the torrent's content as seen by the client.
    #[serde(default)]
    pub content_path: String,
    /// Tracker entries, fetched separately and attached by the client.
    #[serde(skip)]
    pub trackers: Vec<Tracker>,
}
