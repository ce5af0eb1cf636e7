//! Real audio output through the default device.
//!
//! The rodio output stream is not `Send`, so it lives on a dedicated thread
//! that receives play requests over a channel. Each chime is decoded into a
//! detached sink, so requests return as soon as they are queued.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, Sink};

use super::player::{preflight, volume_to_gain, AudioPlayer};
use crate::error::{ChimeError, Result};

/// Message sent to the output thread.
#[derive(Debug)]
enum DeviceMessage {
    /// Play a file at the given linear gain.
    Play { path: PathBuf, gain: f32 },
    /// Request to shut down the output thread.
    Shutdown,
}

/// Plays chimes through the system's default output device.
pub struct DevicePlayer {
    /// Channel to the output thread.
    sender: Mutex<Sender<DeviceMessage>>,
    /// Handle to the output thread.
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl DevicePlayer {
    /// Opens the default output device on a background thread.
    ///
    /// Fails with PLAYBACK_FAILED if no device can be opened.
    pub fn new() -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<DeviceMessage>();
        let (ready_sender, ready_receiver) = mpsc::channel::<std::result::Result<(), String>>();

        let thread_handle = thread::Builder::new()
            .name("chime-audio".to_string())
            .spawn(move || Self::output_loop(receiver, ready_sender))
            .map_err(|e| ChimeError::playback_failed(format!("cannot spawn audio thread: {}", e)))?;

        match ready_receiver.recv() {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                thread_handle.join().ok();
                return Err(ChimeError::playback_failed(reason));
            }
            Err(_) => {
                thread_handle.join().ok();
                return Err(ChimeError::playback_failed("audio thread exited during startup"));
            }
        }

        tracing::info!("audio output device opened");
        Ok(Self {
            sender: Mutex::new(sender),
            thread_handle: Mutex::new(Some(thread_handle)),
        })
    }

    /// Stops the output thread. Sounds still playing are cut off.
    pub fn shutdown(&self) {
        self.sender.lock().send(DeviceMessage::Shutdown).ok();
        if let Some(handle) = self.thread_handle.lock().take() {
            handle.join().ok();
        }
    }

    /// The loop running on the output thread.
    fn output_loop(
        receiver: Receiver<DeviceMessage>,
        ready: Sender<std::result::Result<(), String>>,
    ) {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                ready.send(Err(format!("no audio output device: {}", e))).ok();
                return;
            }
        };
        ready.send(Ok(())).ok();

        loop {
            match receiver.recv() {
                Ok(DeviceMessage::Play { path, gain }) => {
                    let result = File::open(&path)
                        .map_err(|e| e.to_string())
                        .and_then(|file| {
                            Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())
                        })
                        .and_then(|source| {
                            let sink = Sink::try_new(&handle).map_err(|e| e.to_string())?;
                            sink.set_volume(gain);
                            sink.append(source);
                            sink.detach();
                            Ok(())
                        });
                    if let Err(reason) = result {
                        tracing::error!(
                            path = %path.display(),
                            error = %reason,
                            "chime playback failed"
                        );
                    }
                }
                Ok(DeviceMessage::Shutdown) | Err(_) => break,
            }
        }
    }
}

impl AudioPlayer for DevicePlayer {
    fn play(&self, path: &Path, volume_percent: u8) -> Result<()> {
        preflight(path)?;
        self.sender
            .lock()
            .send(DeviceMessage::Play {
                path: path.to_path_buf(),
                gain: volume_to_gain(volume_percent),
            })
            .map_err(|_| ChimeError::playback_failed("audio thread has stopped"))
    }
}

impl Drop for DevicePlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
