//! Raw evdev-based keyboard capture for Linux
//!
//! Reads key events straight from `/dev/input/event*`. Devices are opened
//! read-only and never grabbed, so every event still reaches the desktop.

use super::capture::{CaptureSource, KeySink};
use super::{KeyCode, KeyEvent, ModifierTracker};
use crate::error::CaptureError;
use nix::libc;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A raw input event from the kernel
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct InputEvent {
    tv_sec: i64,
    tv_usec: i64,
    event_type: u16,
    code: u16,
    value: i32,
}

const EV_KEY: u16 = 0x01;
const INPUT_EVENT_SIZE: usize = std::mem::size_of::<InputEvent>();

/// Find all keyboard input devices
pub fn find_keyboard_devices() -> Result<Vec<PathBuf>, CaptureError> {
    let input_dir = PathBuf::from("/dev/input");
    if !input_dir.exists() {
        return Err(CaptureError::NoDevices);
    }

    let mut keyboards = Vec::new();

    for entry in fs::read_dir(&input_dir)?.flatten() {
        let path = entry.path();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

        if name.starts_with("event") && is_keyboard_device(&path) {
            keyboards.push(path);
        }
    }

    if keyboards.is_empty() {
        return Err(CaptureError::NoDevices);
    }

    keyboards.sort();
    Ok(keyboards)
}

/// Check if a device is a keyboard by examining /sys/class/input
fn is_keyboard_device(device_path: &Path) -> bool {
    let Some(name) = device_path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    // Capabilities are hex bitmaps of supported keys
    let caps_path = format!("/sys/class/input/{}/device/capabilities/key", name);
    if let Ok(caps) = fs::read_to_string(&caps_path) {
        let trimmed = caps.trim();
        if !trimmed.is_empty() && trimmed != "0" {
            let total_bits: u32 = trimmed
                .split_whitespace()
                .filter_map(|hex| u64::from_str_radix(hex, 16).ok())
                .map(|n| n.count_ones())
                .sum();
            // A typical keyboard has 80+ keys mapped
            return total_bits > 50;
        }
    }

    let name_path = format!("/sys/class/input/{}/device/name", name);
    if let Ok(dev_name) = fs::read_to_string(&name_path) {
        let dev_name_lower = dev_name.to_lowercase();
        return dev_name_lower.contains("keyboard") || dev_name_lower.contains("kbd");
    }
    false
}

/// Open every keyboard we can read, in non-blocking mode
fn open_keyboards() -> Result<Vec<(PathBuf, File)>, CaptureError> {
    let mut devices = Vec::new();

    for path in find_keyboard_devices()? {
        match File::open(&path) {
            Ok(file) => {
                let fd = file.as_raw_fd();
                // SAFETY: fd is owned by `file`, which outlives both calls
                unsafe {
                    let flags = libc::fcntl(fd, libc::F_GETFL);
                    libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK);
                }
                log::debug!("opened keyboard {}", path.display());
                devices.push((path, file));
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => continue,
            Err(e) => return Err(CaptureError::Io(e)),
        }
    }

    if devices.is_empty() {
        return Err(CaptureError::PermissionDenied(
            "keyboard devices; run with sudo or add user to the 'input' group".to_string(),
        ));
    }
    Ok(devices)
}

/// Decodes raw evdev records into key-downs
struct EvdevReader {
    devices: Vec<(PathBuf, File)>,
    pressed: HashSet<u16>,
    modifiers: ModifierTracker,
    buffer: Vec<u8>,
}

impl EvdevReader {
    fn new(devices: Vec<(PathBuf, File)>) -> Self {
        Self {
            devices,
            pressed: HashSet::new(),
            modifiers: ModifierTracker::new(),
            buffer: vec![0u8; INPUT_EVENT_SIZE * 64],
        }
    }

    /// Drain pending records from every device; returns key-downs sent
    ///
    /// A device that fails with anything but `WouldBlock` (typically
    /// `ENODEV` after an unplug) is logged and dropped.
    fn poll(&mut self, sink: &KeySink) -> usize {
        let now = Instant::now();
        let mut event_count = 0;
        let mut dead = Vec::new();

        for (index, (path, device)) in self.devices.iter_mut().enumerate() {
            loop {
                match device.read(&mut self.buffer) {
                    Ok(bytes_read) if bytes_read >= INPUT_EVENT_SIZE => {
                        let num_events = bytes_read / INPUT_EVENT_SIZE;
                        for i in 0..num_events {
                            let offset = i * INPUT_EVENT_SIZE;
                            let event_bytes = &self.buffer[offset..offset + INPUT_EVENT_SIZE];
                            // SAFETY: the slice holds exactly one kernel input_event
                            let input_event: InputEvent = unsafe {
                                std::ptr::read_unaligned(event_bytes.as_ptr() as *const InputEvent)
                            };
                            if Self::handle(
                                &mut self.pressed,
                                &mut self.modifiers,
                                input_event,
                                now,
                                sink,
                            ) {
                                event_count += 1;
                            }
                        }
                    }
                    Ok(_) => break,
                    Err(ref e)
                        if matches!(
                            e.kind(),
                            io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                        ) =>
                    {
                        break
                    }
                    Err(e) => {
                        log::warn!("dropping keyboard {}: {}", path.display(), e);
                        dead.push(index);
                        break;
                    }
                }
            }
        }

        for index in dead.into_iter().rev() {
            self.devices.remove(index);
            if self.devices.is_empty() {
                log::warn!("no readable keyboard devices left");
            }
        }

        event_count
    }

    /// Apply one record; true if a key-down was delivered
    fn handle(
        pressed: &mut HashSet<u16>,
        modifiers: &mut ModifierTracker,
        input_event: InputEvent,
        now: Instant,
        sink: &KeySink,
    ) -> bool {
        // 1 = press, 2 = repeat, 0 = release
        if input_event.event_type != EV_KEY || input_event.value == 2 {
            return false;
        }

        let scancode = input_event.code;
        if input_event.value == 0 {
            pressed.remove(&scancode);
            modifiers.update(scancode, false);
            return false;
        }

        if !pressed.insert(scancode) {
            return false;
        }
        if modifiers.update(scancode, true) {
            return false;
        }

        match KeyCode::from_scancode(scancode) {
            Some(code) => {
                sink.on_key_event(&KeyEvent::new(code, modifiers.modifiers(), now));
                true
            }
            None => false,
        }
    }
}

struct Worker {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Evdev-based capture for raw scancode delivery
pub struct EvdevCapture {
    poll_interval: Duration,
    worker: Option<Worker>,
}

impl EvdevCapture {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            worker: None,
        }
    }
}

impl CaptureSource for EvdevCapture {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn install(&mut self, sink: KeySink) -> Result<(), CaptureError> {
        if self.worker.is_some() {
            return Err(CaptureError::AlreadyInstalled);
        }

        let devices = open_keyboards()?;
        let device_count = devices.len();
        let poll_interval = self.poll_interval;
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("capture-evdev".to_string())
            .spawn(move || {
                let mut reader = EvdevReader::new(devices);
                loop {
                    match stop_rx.recv_timeout(poll_interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            reader.poll(&sink);
                        }
                        _ => break,
                    }
                }
            })?;

        log::info!("evdev capture reading {} keyboard device(s)", device_count);
        self.worker = Some(Worker {
            stop: stop_tx,
            handle,
        });
        Ok(())
    }

    fn uninstall(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop.send(());
            let _ = worker.handle.join();
            log::info!("evdev capture removed");
        }
    }

    fn is_installed(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for EvdevCapture {
    fn drop(&mut self) {
        self.uninstall();
    }
}

/// Get a status message about evdev availability
pub fn evdev_status() -> String {
    match find_keyboard_devices() {
        Ok(devices) => format!("{} keyboard device(s) found", devices.len()),
        Err(CaptureError::NoDevices) => "No keyboard devices found".to_string(),
        Err(CaptureError::PermissionDenied(_)) => {
            "Permission denied - run with sudo or add user to 'input' group".to_string()
        }
        Err(e) => format!("Error: {}", e),
    }
}
