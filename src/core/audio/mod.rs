//=========================================================================
// Audio Collaborator
//=========================================================================
//
// Sound handles bound to decoded buffers, driven by commands sent to a
// dedicated audio thread.
//
// Architecture:
//   ScreenState ── Sound::play()/stop() ──► Sender<AudioCmd>
//                                                │
//                                   audio thread ▼ (owns the device)
//
// Handles are usually held as `Option<Sound>` because buffers arrive with
// the asset bundle; `SoundSlot` makes play/stop on an absent handle a
// no-op. Mixing and output are outside this crate: the bundled audio
// thread only tracks which voices are live.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace};

//=== SoundBuffer =========================================================

/// Decoded PCM samples (interleaved f32).
#[derive(Debug, Clone, PartialEq)]
pub struct SoundBuffer {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Arc<[f32]>,
}

impl SoundBuffer {
    /// Mono sine tone.
    pub fn tone(name: &str, frequency: f32, seconds: f32, sample_rate: u32) -> Self {
        let count = (seconds.max(0.0) * sample_rate as f32) as usize;
        let samples: Vec<f32> = (0..count)
            .map(|i| (TAU * frequency * i as f32 / sample_rate as f32).sin() * 0.25)
            .collect();

        Self {
            name: name.to_string(),
            sample_rate,
            channels: 1,
            samples: samples.into(),
        }
    }

    /// Playback length in seconds.
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / (self.sample_rate as f32 * self.channels as f32)
    }
}

//=== AudioCmd ============================================================

/// Identifies one sound handle on the audio thread.
pub type VoiceId = u64;

/// Commands sent to the audio thread.
#[derive(Debug, Clone)]
pub enum AudioCmd {
    Play {
        voice: VoiceId,
        buffer: Arc<SoundBuffer>,
        looped: bool,
    },
    Stop {
        voice: VoiceId,
    },
    Shutdown,
}

//=== AudioListener =======================================================

/// Factory for sound handles sharing one command channel.
#[derive(Debug, Clone)]
pub struct AudioListener {
    commands: Sender<AudioCmd>,
    next_voice: Arc<AtomicU64>,
}

impl AudioListener {
    pub fn new(commands: Sender<AudioCmd>) -> Self {
        Self {
            commands,
            next_voice: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Listener whose commands go nowhere.
    pub fn silent() -> Self {
        let (tx, _rx) = unbounded();
        Self::new(tx)
    }

    /// Creates a stopped, non-looping handle bound to `buffer`.
    pub fn sound(&self, buffer: Arc<SoundBuffer>) -> Sound {
        Sound {
            voice: self.next_voice.fetch_add(1, Ordering::Relaxed),
            buffer,
            looped: false,
            playing: false,
            commands: self.commands.clone(),
        }
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(AudioCmd::Shutdown);
    }
}

//=== Sound ===============================================================

/// Playable handle bound to one buffer.
#[derive(Debug)]
pub struct Sound {
    voice: VoiceId,
    buffer: Arc<SoundBuffer>,
    looped: bool,
    playing: bool,
    commands: Sender<AudioCmd>,
}

impl Sound {
    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    pub fn buffer(&self) -> &SoundBuffer {
        &self.buffer
    }

    pub fn set_loop(&mut self, looped: bool) {
        self.looped = looped;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Starts playback from the beginning, restarting if already playing.
    pub fn play(&mut self) {
        if self.playing {
            self.send(AudioCmd::Stop { voice: self.voice });
        }
        self.send(AudioCmd::Play {
            voice: self.voice,
            buffer: Arc::clone(&self.buffer),
            looped: self.looped,
        });
        self.playing = true;
    }

    /// Stops playback. No-op if not playing.
    pub fn stop(&mut self) {
        if !self.playing {
            return;
        }
        self.send(AudioCmd::Stop { voice: self.voice });
        self.playing = false;
    }

    fn send(&self, cmd: AudioCmd) {
        if self.commands.send(cmd).is_err() {
            trace!("Audio channel closed, dropping command for voice {}", self.voice);
        }
    }
}

//=== SoundSlot ===========================================================

/// Play/stop on a handle that may not be loaded yet.
pub trait SoundSlot {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

impl SoundSlot for Option<Sound> {
    fn play(&mut self) {
        if let Some(sound) = self {
            sound.play();
        }
    }

    fn stop(&mut self) {
        if let Some(sound) = self {
            sound.stop();
        }
    }

    fn is_playing(&self) -> bool {
        self.as_ref().is_some_and(Sound::is_playing)
    }
}

//=== Audio Thread ========================================================

/// Creates a listener plus the receiving end for [`spawn_audio_thread`].
pub fn audio_channel() -> (AudioListener, Receiver<AudioCmd>) {
    let (tx, rx) = unbounded();
    (AudioListener::new(tx), rx)
}

/// Spawns the "audio" thread draining `commands`.
///
/// # Errors
///
/// Returns the OS error if the thread cannot be spawned.
pub fn spawn_audio_thread(commands: Receiver<AudioCmd>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("audio".into()).spawn(move || audio_thread(commands))
}

/// Processes commands until `Shutdown` or channel disconnect.
fn audio_thread(commands: Receiver<AudioCmd>) {
    let mut voices: HashMap<VoiceId, (String, bool)> = HashMap::new();
    info!("Audio thread started");

    for cmd in commands.iter() {
        match cmd {
            AudioCmd::Play { voice, buffer, looped } => {
                debug!("Audio: play voice {} '{}' (looped: {}, {:.2}s)", voice, buffer.name, looped, buffer.duration());
                voices.insert(voice, (buffer.name.clone(), looped));
            }
            AudioCmd::Stop { voice } => {
                if let Some((name, _)) = voices.remove(&voice) {
                    debug!("Audio: stop voice {} '{}'", voice, name);
                }
            }
            AudioCmd::Shutdown => break,
        }
    }

    info!("Audio thread exiting ({} voice(s) still live)", voices.len());
}

//=========================================================================
// Unit Tests
//=========================================================================
