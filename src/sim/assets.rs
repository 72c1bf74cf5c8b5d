//! Sprite asset table
//!
//! Built once at startup and shared read-only. The core only ever reports
//! `FrameId`s; the renderer resolves them to image paths through this table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Every animated sprite kind in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    SpiderIdle,
    SpiderWalk,
    Glass,
    GlassShadow,
    WebUnlocked,
    WebLocked,
    Coin,
    Spray,
    Gas0,
    Gas1,
    Heart,
    /// Full-screen dimmer shown over the frozen world
    Darken,
}

impl AssetId {
    pub const ALL: [AssetId; 12] = [
        AssetId::SpiderIdle,
        AssetId::SpiderWalk,
        AssetId::Glass,
        AssetId::GlassShadow,
        AssetId::WebUnlocked,
        AssetId::WebLocked,
        AssetId::Coin,
        AssetId::Spray,
        AssetId::Gas0,
        AssetId::Gas1,
        AssetId::Heart,
        AssetId::Darken,
    ];

    /// Image file stem
    pub fn stem(&self) -> &'static str {
        match self {
            AssetId::SpiderIdle => "spider-idle",
            AssetId::SpiderWalk => "spider-walk",
            AssetId::Glass => "glass",
            AssetId::GlassShadow => "glass-shadow",
            AssetId::WebUnlocked => "web-notlocked",
            AssetId::WebLocked => "web",
            AssetId::Coin => "coin",
            AssetId::Spray => "spray",
            AssetId::Gas0 => "gas-0",
            AssetId::Gas1 => "gas-1",
            AssetId::Heart => "heart",
            AssetId::Darken => "darken",
        }
    }

    /// Number of animation frames
    pub fn frame_count(&self) -> u8 {
        match self {
            // Still images
            AssetId::WebUnlocked | AssetId::WebLocked | AssetId::Darken => 1,
            _ => 2,
        }
    }
}

/// One frame of one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId {
    pub asset: AssetId,
    pub index: u8,
}

/// Read-only map from asset to its ordered frame images
#[derive(Debug, Clone)]
pub struct AssetTable {
    paths: HashMap<AssetId, Vec<String>>,
}

impl AssetTable {
    /// The game's standard image set (`images/<stem>-<i>.png`)
    pub fn standard() -> Self {
        let paths = AssetId::ALL
            .iter()
            .map(|&asset| {
                let count = asset.frame_count();
                let files = if count == 1 {
                    vec![format!("images/{}.png", asset.stem())]
                } else {
                    (0..count)
                        .map(|i| format!("images/{}-{}.png", asset.stem(), i))
                        .collect()
                };
                (asset, files)
            })
            .collect();
        Self { paths }
    }

    /// Ordered frames for an asset (never empty)
    pub fn frames(&self, asset: AssetId) -> Vec<FrameId> {
        let count = self.paths.get(&asset).map_or(1, |p| p.len().max(1));
        (0..count)
            .map(|i| FrameId {
                asset,
                index: i as u8,
            })
            .collect()
    }

    /// Image path for a frame, if the table knows it
    pub fn path(&self, frame: FrameId) -> Option<&str> {
        self.paths
            .get(&frame.asset)
            .and_then(|p| p.get(frame.index as usize))
            .map(String::as_str)
    }
}
