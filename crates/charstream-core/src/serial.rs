//! Unbuffered streams over an external byte channel.
//!
//! `SerialBuf` adapts a [`SerialPort`] to the buffer contract without
//! any windowing: both areas stay permanently empty, so every public
//! operation lands in a hook and maps one-to-one onto a port call.
//! Seeking is meaningless on a wire and stays unsupported.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::ios::{BufHandle, OpenMode};
use crate::stream::Stream;
use crate::streambuf::{BufAreas, StreamBuf};

/// The byte channel a serial buffer drives.
pub trait SerialPort {
    /// Bytes ready to read without blocking.
    fn available(&self) -> usize;

    /// Next byte without consuming it.
    fn peek(&mut self) -> Option<u8>;

    /// Consume and return the next byte.
    fn read(&mut self) -> Option<u8>;

    /// Send one byte. `false` means the channel refused it.
    fn write(&mut self, c: u8) -> bool;

    /// Send a run of bytes; returns how many the channel accepted.
    fn write_all(&mut self, buf: &[u8]) -> usize {
        let mut n = 0;
        for &c in buf {
            if !self.write(c) {
                break;
            }
            n += 1;
        }
        n
    }
}

/// Pass-through buffer over a port.
pub struct SerialBuf<P: SerialPort> {
    port: P,
    mode: OpenMode,
    areas: BufAreas,
}

impl<P: SerialPort> SerialBuf<P> {
    pub fn new(port: P, mode: OpenMode) -> Self {
        Self {
            port,
            mode,
            areas: BufAreas::default(),
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    pub fn shared(self) -> Rc<RefCell<SerialBuf<P>>> {
        Rc::new(RefCell::new(self))
    }
}

impl<P: SerialPort> StreamBuf for SerialBuf<P> {
    fn areas(&self) -> &BufAreas {
        &self.areas
    }

    fn areas_mut(&mut self) -> &mut BufAreas {
        &mut self.areas
    }

    fn read_window(&self) -> &[u8] {
        &[]
    }

    fn write_window(&mut self) -> &mut [u8] {
        &mut []
    }

    fn underflow(&mut self) -> Option<u8> {
        if self.mode.contains(OpenMode::IN) {
            self.port.peek()
        } else {
            None
        }
    }

    fn uflow(&mut self) -> Option<u8> {
        if self.mode.contains(OpenMode::IN) {
            self.port.read()
        } else {
            None
        }
    }

    fn overflow(&mut self, c: u8) -> Option<u8> {
        if self.mode.contains(OpenMode::OUT) && self.port.write(c) {
            Some(c)
        } else {
            None
        }
    }

    fn xsputn(&mut self, src: &[u8]) -> usize {
        if self.mode.contains(OpenMode::OUT) {
            self.port.write_all(src)
        } else {
            0
        }
    }

    fn showmanyc(&mut self) -> isize {
        self.port.available() as isize
    }
}

/// Bidirectional stream over `port`.
pub fn serial_stream<P: SerialPort + 'static>(port: P) -> (Stream, Rc<RefCell<SerialBuf<P>>>) {
    let sb = SerialBuf::new(port, OpenMode::IN | OpenMode::OUT).shared();
    let handle: BufHandle = sb.clone();
    (Stream::new(handle), sb)
}

/// In-memory port with a seeded receive queue and a bounded transmit
/// sink. Backs tests and fixture runs; no hardware involved.
pub struct LoopbackPort {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    tx_capacity: Option<usize>,
}

impl LoopbackPort {
    pub fn new(rx: &[u8]) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
            tx_capacity: None,
        }
    }

    /// Refuse transmit bytes past `capacity`.
    pub fn with_tx_capacity(rx: &[u8], capacity: usize) -> Self {
        Self {
            rx: rx.iter().copied().collect(),
            tx: Vec::new(),
            tx_capacity: Some(capacity),
        }
    }

    pub fn transmitted(&self) -> &[u8] {
        &self.tx
    }

    /// Queue more receive data, as if the wire delivered it.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }
}

impl SerialPort for LoopbackPort {
    fn available(&self) -> usize {
        self.rx.len()
    }

    fn peek(&mut self) -> Option<u8> {
        self.rx.front().copied()
    }

    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, c: u8) -> bool {
        if let Some(cap) = self.tx_capacity
            && self.tx.len() >= cap
        {
            return false;
        }
        self.tx.push(c);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ios::SeekDir;

    #[test]
    fn test_read_consumes_port_bytes() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"abc"), OpenMode::IN);
        assert_eq!(sb.sgetc(), Some(b'a'));
        assert_eq!(sb.sgetc(), Some(b'a'));
        assert_eq!(sb.sbumpc(), Some(b'a'));
        assert_eq!(sb.sbumpc(), Some(b'b'));
        assert_eq!(sb.sbumpc(), Some(b'c'));
        assert_eq!(sb.sbumpc(), None);
    }

    #[test]
    fn test_in_avail_reports_port_queue() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"xyz"), OpenMode::IN);
        assert_eq!(sb.in_avail(), 3);
        sb.sbumpc();
        assert_eq!(sb.in_avail(), 2);
    }

    #[test]
    fn test_write_lands_on_port_immediately() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b""), OpenMode::OUT);
        assert_eq!(sb.sputc(b'h'), Some(b'h'));
        assert_eq!(sb.sputn(b"ello"), 4);
        assert_eq!(sb.port().transmitted(), b"hello");
    }

    #[test]
    fn test_write_stops_at_port_capacity() {
        let mut sb = SerialBuf::new(LoopbackPort::with_tx_capacity(b"", 3), OpenMode::OUT);
        assert_eq!(sb.sputn(b"abcdef"), 3);
        assert_eq!(sb.sputc(b'x'), None);
        assert_eq!(sb.port().transmitted(), b"abc");
    }

    #[test]
    fn test_direction_gating() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"in"), OpenMode::IN);
        assert_eq!(sb.sputc(b'x'), None);
        let mut sb = SerialBuf::new(LoopbackPort::new(b"in"), OpenMode::OUT);
        assert_eq!(sb.sgetc(), None);
    }

    #[test]
    fn test_putback_is_refused() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"ab"), OpenMode::IN);
        assert_eq!(sb.sbumpc(), Some(b'a'));
        assert_eq!(sb.sputbackc(b'a'), None);
        assert_eq!(sb.sungetc(), None);
    }

    #[test]
    fn test_seek_is_unsupported() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"ab"), OpenMode::IN | OpenMode::OUT);
        assert_eq!(sb.pubseekoff(0, SeekDir::Cur, OpenMode::IN), None);
        assert_eq!(sb.pubseekpos(0, OpenMode::OUT), None);
    }

    #[test]
    fn test_feed_after_drain() {
        let mut sb = SerialBuf::new(LoopbackPort::new(b"a"), OpenMode::IN);
        assert_eq!(sb.sbumpc(), Some(b'a'));
        assert_eq!(sb.sbumpc(), None);
        sb.port_mut().feed(b"b");
        assert_eq!(sb.sbumpc(), Some(b'b'));
    }
}
