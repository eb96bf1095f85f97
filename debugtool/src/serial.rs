// -*- coding: utf-8 -*-

use crate::frame::{Decoder, Frame};
use anyhow::{self as ah, Context as _};
use std::time::Duration;

const BAUD: u32 = 19_200;

pub fn run_serial(port: &Option<String>, mut on_frame: impl FnMut(Frame)) -> ah::Result<()> {
    let port = port.as_deref().unwrap_or("/dev/ttyUSB0");
    let mut serial = serialport::new(port, BAUD)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .stop_bits(serialport::StopBits::One)
        .timeout(Duration::from_millis(500))
        .open()
        .context("Open serial port")?;

    let mut decoder = Decoder::new();
    let mut buf = [0_u8; 64];
    loop {
        let count = match serial.read(&mut buf) {
            Ok(count) => count,
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
            Err(e) => return Err(e).context("Serial port read"),
        };
        for &byte in &buf[..count] {
            if let Some(frame) = decoder.push(byte) {
                on_frame(frame);
            }
        }
    }
}

// vim: ts=4 sw=4 expandtab
