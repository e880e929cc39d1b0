//! Linux fbdev display (/dev/fbN)
//!
//! The device may not have a mode set yet when we start (display drivers on
//! embedded boards often come up after userspace), so geometry is polled with a
//! bounded number of retries before giving up.

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::thread;
use std::time::Duration;

use crate::error::DeviceError;

use super::surface::{Geometry, Surface};

const FBIOGET_VSCREENINFO: u32 = 0x4600;
const FBIOGET_FSCREENINFO: u32 = 0x4602;

#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// struct fb_var_screeninfo from <linux/fb.h>
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// struct fb_fix_screeninfo from <linux/fb.h>
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

impl FbVarScreeninfo {
    fn query(file: &File, path: &str) -> Result<Self, DeviceError> {
        let mut info = Self::default();
        // SAFETY: FBIOGET_VSCREENINFO fills exactly one fb_var_screeninfo
        let rc = unsafe {
            libc::ioctl(file.as_raw_fd(), FBIOGET_VSCREENINFO as _, &mut info as *mut Self)
        };
        if rc < 0 {
            return Err(DeviceError::Query {
                path: path.to_string(),
                request: "FBIOGET_VSCREENINFO",
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(info)
    }
}

impl FbFixScreeninfo {
    fn query(file: &File, path: &str) -> Result<Self, DeviceError> {
        let mut info = Self::default();
        // SAFETY: FBIOGET_FSCREENINFO fills exactly one fb_fix_screeninfo
        let rc = unsafe {
            libc::ioctl(file.as_raw_fd(), FBIOGET_FSCREENINFO as _, &mut info as *mut Self)
        };
        if rc < 0 {
            return Err(DeviceError::Query {
                path: path.to_string(),
                request: "FBIOGET_FSCREENINFO",
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(info)
    }
}

/// xres, yres, line_length and smem_len all set
fn mode_ready(var: &FbVarScreeninfo, fix: &FbFixScreeninfo) -> bool {
    var.xres > 0 && var.yres > 0 && fix.line_length > 0 && fix.smem_len > 0
}

/// Run `query` until the driver reports a usable mode, at most `retries` times
/// (at least once), sleeping `backoff` between attempts. Query errors count as
/// failed attempts.
fn wait_for_mode<Q>(
    path: &str,
    retries: u32,
    backoff: Duration,
    mut query: Q,
) -> Result<(FbVarScreeninfo, FbFixScreeninfo), DeviceError>
where
    Q: FnMut() -> Result<(FbVarScreeninfo, FbFixScreeninfo), DeviceError>,
{
    let attempts = retries.max(1);
    for attempt in 1..=attempts {
        match query() {
            Ok((var, fix)) if mode_ready(&var, &fix) => return Ok((var, fix)),
            Ok(_) => {
                log::info!("Framebuffer: attempt {}/{}: geometry not ready", attempt, attempts);
            }
            Err(e) => {
                log::warn!("Framebuffer: attempt {}/{}: {}", attempt, attempts, e);
            }
        }
        if attempt < attempts {
            thread::sleep(backoff);
        }
    }
    Err(DeviceError::NotReady {
        path: path.to_string(),
        attempts,
    })
}

/// Visible geometry of a ready mode; only RGB565 (16 bpp) is drawable
fn geometry_for(var: &FbVarScreeninfo, fix: &FbFixScreeninfo, path: &str) -> Result<Geometry, DeviceError> {
    if var.bits_per_pixel != 16 {
        return Err(DeviceError::UnsupportedDepth {
            path: path.to_string(),
            bits_per_pixel: var.bits_per_pixel,
        });
    }
    Ok(Geometry {
        width: var.xres as usize,
        height: var.yres as usize,
        stride_px: fix.line_length as usize / 2,
    })
}

/// Memory-mapped RGB565 framebuffer, unmapped on drop
pub struct Framebuffer {
    // Kept open for the lifetime of the mapping
    _file: File,
    map: *mut u16,
    map_len: usize,
    geometry: Geometry,
}

impl Framebuffer {
    /// Open `path`, wait for valid geometry, and map the visible rows.
    ///
    /// Geometry is considered valid once xres, yres, line_length and smem_len
    /// are all non-zero. Query failures and empty geometry both count as a
    /// failed attempt and are retried after `backoff`, up to `retries` times.
    pub fn open(path: &str, retries: u32, backoff: Duration) -> Result<Self, DeviceError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DeviceError::Open {
                path: path.to_string(),
                source,
            })?;

        let (var, fix) = wait_for_mode(path, retries, backoff, || {
            Ok((FbVarScreeninfo::query(&file, path)?, FbFixScreeninfo::query(&file, path)?))
        })?;
        let geometry = geometry_for(&var, &fix, path)?;
        let map_len = fix.line_length as usize * var.yres as usize;

        // SAFETY: mapping a device fd we own; length comes from the driver's own
        // line_length * yres and is checked against MAP_FAILED below
        let map = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                map_len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        if map == libc::MAP_FAILED {
            return Err(DeviceError::Map {
                len: map_len,
                source: std::io::Error::last_os_error(),
            });
        }

        log::info!(
            "Framebuffer: {} {}x{} stride {}px ({} bytes mapped)",
            path,
            geometry.width,
            geometry.height,
            geometry.stride_px,
            map_len
        );

        Ok(Self {
            _file: file,
            map: map as *mut u16,
            map_len,
            geometry,
        })
    }
}

impl Surface for Framebuffer {
    fn geometry(&self) -> Geometry {
        self.geometry
    }

    fn pixels_mut(&mut self) -> &mut [u16] {
        // SAFETY: map is a live MAP_SHARED region of map_len bytes, 2-byte
        // aligned (page aligned), exclusively borrowed through &mut self
        unsafe { std::slice::from_raw_parts_mut(self.map, self.map_len / 2) }
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        // SAFETY: unmapping exactly what open() mapped
        unsafe {
            libc::munmap(self.map as *mut libc::c_void, self.map_len);
        }
    }
}
