// -*- coding: utf-8 -*-

#![forbid(unsafe_code)]

mod frame;
mod serial;

use crate::{
    frame::{DebugId, Frame},
    serial::run_serial,
};
use anyhow as ah;
use clap::Parser;
use std::{collections::HashMap, thread, time::Duration};

/// Print the debug values streamed by the spot welder firmware.
#[derive(Parser, Debug)]
struct Opts {
    /// Serial port. Defaults to /dev/ttyUSB0.
    port: Option<String>,

    /// Only print values that changed.
    #[arg(short, long)]
    changes: bool,
}

fn main() -> ah::Result<()> {
    let opts = Opts::parse();

    let mut last: HashMap<u8, u16> = HashMap::new();
    let mut print_frame = |frame: Frame| {
        if frame.id == DebugId::Sync {
            return;
        }
        if opts.changes && last.insert(frame.id as u8, frame.value) == Some(frame.value) {
            return;
        }
        println!("{frame}");
    };

    loop {
        if let Err(e) = run_serial(&opts.port, &mut print_frame) {
            eprintln!("Serial error: {e:?}");
        }
        thread::sleep(Duration::from_millis(5000));
    }
}

// vim: ts=4 sw=4 expandtab
