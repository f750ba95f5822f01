// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-instance debug ring buffer.
//!
//! Each glue instance owns one of these rather than sharing a static, since
//! up to four GMACs may be probed and we want their histories kept apart.
//! Entries are recorded with [`trace_entry!`], which stamps them with the
//! source line.  An entry identical to the most recent one (same line, same
//! payload) bumps that entry's count instead of using a new slot.

use crate::config::PhyInterfaceMode;

/// Which syscon region a register access went to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Region {
    NssCommon,
    QsgmiiCsr,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Trace {
    None,
    Write { region: Region, offset: u32, value: u32 },
    SetSpeed(u32),
    UnsupportedSpeed(u32),
    UnsupportedMode(PhyInterfaceMode),
    InvalidInstanceForMode(u8),
    /// The QSGMII CSR region is absent; tolerated since the port is RGMII
    QsgmiiCsrMissing,
    CoreClkRateFailed(u32),
    Probed { id: u8, mode: PhyInterfaceMode },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RingbufEntry<T: Copy + PartialEq> {
    pub line: u16,
    pub generation: u16,
    pub count: u32,
    pub payload: T,
}

#[derive(Debug)]
pub struct Ringbuf<T: Copy + PartialEq, const N: usize> {
    last: Option<usize>,
    buffer: [RingbufEntry<T>; N],
}

impl<T: Copy + PartialEq, const N: usize> Ringbuf<T, N> {
    pub const fn new(init: T) -> Self {
        Self {
            last: None,
            buffer: [RingbufEntry {
                line: 0,
                generation: 0,
                count: 0,
                payload: init,
            }; N],
        }
    }

    pub fn entry(&mut self, line: u16, payload: T) {
        let last = self.last.unwrap_or(usize::MAX);
        if let Some(ent) = self.buffer.get_mut(last) {
            if ent.line == line && ent.payload == payload {
                if let Some(count) = ent.count.checked_add(1) {
                    ent.count = count;
                    return;
                }
            }
        }

        let ndx = match last.wrapping_add(1) {
            n if n >= N => 0,
            n => n,
        };
        let ent = &mut self.buffer[ndx];
        *ent = RingbufEntry {
            line,
            generation: ent.generation.wrapping_add(1),
            count: 1,
            payload,
        };
        self.last = Some(ndx);
    }

    /// Iterates over recorded entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &RingbufEntry<T>> + '_ {
        let start = self.last.map(|l| l + 1).unwrap_or(0);
        let (newer, older) = self.buffer.split_at(start.min(N));
        older.iter().chain(newer).filter(|e| e.count > 0)
    }

    /// Returns the most recently recorded entry
    pub fn latest(&self) -> Option<&RingbufEntry<T>> {
        self.last.and_then(|l| self.buffer.get(l))
    }
}

/// Records `payload` in the ring buffer `buf`, tagged with the current line
#[macro_export]
macro_rules! trace_entry {
    ($buf:expr, $payload:expr) => {{
        let p = $payload;
        $crate::trace::Ringbuf::entry(&mut $buf, line!() as u16, p);
    }};
}
