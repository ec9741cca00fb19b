/// Audio glue — routes simulation cues to their sound handles.
///
/// A terminal has no mixer, so "playing" a sound means logging the trigger
/// and, for the emphatic ones, ringing the terminal bell.  The sink also
/// tracks which background loop is notionally running so on/off cues stay
/// paired no matter what order the simulation emits them in.

use std::io::Write;

use gravity_bird::resources::{ResourceBundle, SoundHandle, SoundKey};
use gravity_bird::sim::Cue;

pub struct CueSink {
    bell: bool,
    bg: Option<SoundKey>,
}

impl CueSink {
    pub fn new(bell: bool) -> Self {
        Self { bell, bg: None }
    }

    /// Route one cue.
    pub fn play<W: Write>(
        &mut self,
        out: &mut W,
        bundle: &ResourceBundle,
        cue: Cue,
    ) -> std::io::Result<()> {
        match cue {
            Cue::Wing => self.one_shot(out, bundle.sound(SoundKey::Wing), false),
            Cue::Point => self.one_shot(out, bundle.sound(SoundKey::Point), true),
            Cue::Hit => self.one_shot(out, bundle.sound(SoundKey::Hit), true),
            Cue::Die => self.one_shot(out, bundle.sound(SoundKey::Die), true),
            Cue::Swoosh => self.one_shot(out, bundle.sound(SoundKey::Swoosh), false),
            Cue::Victory => self.one_shot(out, bundle.sound(SoundKey::Victory), true),
            Cue::BgNormalOn => {
                self.bg_on(bundle, SoundKey::BgNormal);
                Ok(())
            }
            Cue::BgNormalOff => {
                self.bg_off(bundle, SoundKey::BgNormal);
                Ok(())
            }
            Cue::BgInvertedOn => {
                self.bg_on(bundle, SoundKey::BgInverted);
                Ok(())
            }
            Cue::BgInvertedOff => {
                self.bg_off(bundle, SoundKey::BgInverted);
                Ok(())
            }
        }
    }

    fn one_shot<W: Write>(
        &self,
        out: &mut W,
        handle: &SoundHandle,
        emphatic: bool,
    ) -> std::io::Result<()> {
        log::debug!("sound '{}'", handle.label);
        if emphatic && self.bell {
            out.write_all(b"\x07")?;
        }
        Ok(())
    }

    fn bg_on(&mut self, bundle: &ResourceBundle, key: SoundKey) {
        if self.bg == Some(key) {
            return;
        }
        log::debug!("bg loop '{}' on", bundle.sound(key).label);
        self.bg = Some(key);
    }

    fn bg_off(&mut self, bundle: &ResourceBundle, key: SoundKey) {
        if self.bg == Some(key) {
            log::debug!("bg loop '{}' off", bundle.sound(key).label);
            self.bg = None;
        }
    }
}
