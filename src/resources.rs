/// Asset handles, loaded as one atomic bundle.
///
/// The simulation never looks inside a sprite or a sound — it passes the
/// typed keys around and the display/audio glue resolves them.  `load()`
/// either yields a bundle with every required handle present and valid, or
/// fails with the first problem it finds; the simulation is constructed
/// only from a loaded bundle, so it can never start half-provisioned.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("missing image asset '{0}'")]
    MissingImage(&'static str),
    #[error("image asset '{0}' has no rows")]
    EmptySprite(&'static str),
    #[error("image asset '{0}' has ragged rows")]
    RaggedSprite(&'static str),
    #[error("missing sound asset '{0}'")]
    MissingSound(&'static str),
}

// ── Keys ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKey {
    BirdA,
    BirdB,
    BirdC,
    GameBackground,
    GameOver,
    GameTute,
    GravityInverter,
    PipeBot,
    PipeTop,
}

impl ImageKey {
    pub const ALL: [ImageKey; 9] = [
        ImageKey::BirdA,
        ImageKey::BirdB,
        ImageKey::BirdC,
        ImageKey::GameBackground,
        ImageKey::GameOver,
        ImageKey::GameTute,
        ImageKey::GravityInverter,
        ImageKey::PipeBot,
        ImageKey::PipeTop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ImageKey::BirdA => "bird_a",
            ImageKey::BirdB => "bird_b",
            ImageKey::BirdC => "bird_c",
            ImageKey::GameBackground => "game_background",
            ImageKey::GameOver => "game_over",
            ImageKey::GameTute => "game_tute",
            ImageKey::GravityInverter => "gravity_inverter",
            ImageKey::PipeBot => "pipe_bot",
            ImageKey::PipeTop => "pipe_top",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    BgNormal,
    BgInverted,
    Die,
    Hit,
    Point,
    Swoosh,
    Wing,
    Victory,
}

impl SoundKey {
    pub const ALL: [SoundKey; 8] = [
        SoundKey::BgNormal,
        SoundKey::BgInverted,
        SoundKey::Die,
        SoundKey::Hit,
        SoundKey::Point,
        SoundKey::Swoosh,
        SoundKey::Wing,
        SoundKey::Victory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundKey::BgNormal => "bg_normal",
            SoundKey::BgInverted => "bg_inverted",
            SoundKey::Die => "die",
            SoundKey::Hit => "hit",
            SoundKey::Point => "point",
            SoundKey::Swoosh => "swoosh",
            SoundKey::Wing => "wing",
            SoundKey::Victory => "victory",
        }
    }
}

// ── Handles ──────────────────────────────────────────────────────────────────

/// A character sprite: equal-width rows of cells.  Opaque to the simulation.
#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub rows: &'static [&'static str],
}

impl Sprite {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |r| r.chars().count())
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

/// An opaque sound handle.  The audio collaborator decides what triggering
/// one actually does.
#[derive(Clone, Copy, Debug)]
pub struct SoundHandle {
    pub label: &'static str,
}

// ── Sprite art ───────────────────────────────────────────────────────────────

const BIRD_A: Sprite = Sprite { rows: &["\\o>"] };
const BIRD_B: Sprite = Sprite { rows: &["-o>"] };
const BIRD_C: Sprite = Sprite { rows: &["/o>"] };

const GAME_BACKGROUND: Sprite = Sprite { rows: &["."] };

const GAME_OVER: Sprite = Sprite {
    rows: &[
        "╔══════════════════╗",
        "║    GAME  OVER    ║",
        "╚══════════════════╝",
    ],
};

const GAME_TUTE: Sprite = Sprite {
    rows: &[
        "╔══════════════════╗",
        "║   GRAVITY BIRD   ║",
        "║                  ║",
        "║  SPACE to flap   ║",
        "║  mind the flip!  ║",
        "╚══════════════════╝",
    ],
};

const GRAVITY_INVERTER: Sprite = Sprite {
    rows: &["(↕)"],
};

const PIPE_BOT: Sprite = Sprite { rows: &["█"] };
const PIPE_TOP: Sprite = Sprite { rows: &["█"] };

fn image_manifest() -> HashMap<ImageKey, Sprite> {
    HashMap::from([
        (ImageKey::BirdA, BIRD_A),
        (ImageKey::BirdB, BIRD_B),
        (ImageKey::BirdC, BIRD_C),
        (ImageKey::GameBackground, GAME_BACKGROUND),
        (ImageKey::GameOver, GAME_OVER),
        (ImageKey::GameTute, GAME_TUTE),
        (ImageKey::GravityInverter, GRAVITY_INVERTER),
        (ImageKey::PipeBot, PIPE_BOT),
        (ImageKey::PipeTop, PIPE_TOP),
    ])
}

fn sound_manifest() -> HashMap<SoundKey, SoundHandle> {
    SoundKey::ALL
        .iter()
        .map(|&key| (key, SoundHandle { label: key.name() }))
        .collect()
}

// ── Bundle ───────────────────────────────────────────────────────────────────

/// Every image and sound the game needs, resolved up front.
#[derive(Clone, Debug)]
pub struct ResourceBundle {
    images: HashMap<ImageKey, Sprite>,
    sounds: HashMap<SoundKey, SoundHandle>,
}

impl ResourceBundle {
    /// Load and validate the complete asset set.  Fails atomically: either
    /// every required handle is present and well-formed, or nothing loads.
    pub fn load() -> Result<Self, ResourceError> {
        Self::from_manifests(image_manifest(), sound_manifest())
    }

    pub fn from_manifests(
        images: HashMap<ImageKey, Sprite>,
        sounds: HashMap<SoundKey, SoundHandle>,
    ) -> Result<Self, ResourceError> {
        for key in ImageKey::ALL {
            let sprite = images
                .get(&key)
                .ok_or(ResourceError::MissingImage(key.name()))?;
            if sprite.rows.is_empty() {
                return Err(ResourceError::EmptySprite(key.name()));
            }
            let width = sprite.width();
            if sprite.rows.iter().any(|r| r.chars().count() != width) {
                return Err(ResourceError::RaggedSprite(key.name()));
            }
        }
        for key in SoundKey::ALL {
            if !sounds.contains_key(&key) {
                return Err(ResourceError::MissingSound(key.name()));
            }
        }
        Ok(Self { images, sounds })
    }

    pub fn image(&self, key: ImageKey) -> &Sprite {
        &self.images[&key]
    }

    pub fn sound(&self, key: SoundKey) -> &SoundHandle {
        &self.sounds[&key]
    }
}
