//! DMX512 UART receive task
//!
//! The UART runs at 250 kbaud, 8N2. Each read collects bytes up to the next
//! line break, which the assembler turns into one frame.

use defmt::*;
use embassy_rp::uart::{Async, ReadToBreakError, UartRx};

use tcd_protocol::{FrameAssembler, MAX_FRAME_SIZE};

use crate::channels::{FRAME_SIGNAL, LINE_ACTIVITY};

/// One byte more than a full universe so oversized frames are detected
const RX_BUF_SIZE: usize = MAX_FRAME_SIZE + 1;

/// DMX RX task - assembles break-delimited frames and hands them over
#[embassy_executor::task]
pub async fn dmx_rx_task(mut rx: UartRx<'static, Async>) {
    info!("DMX RX task started");

    let mut assembler = FrameAssembler::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read_to_break(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes before break", n);
                if assembler.feed_bytes(&buf[..n]).is_err() {
                    LINE_ACTIVITY.signal(());
                }
                if let Some(frame) = assembler.on_break() {
                    FRAME_SIGNAL.signal(frame);
                }
            }
            Err(ReadToBreakError::MissingBreak(n)) => {
                // buffer filled without a break: oversized frame
                debug!("DMX frame too long ({} bytes)", n);
                let _ = assembler.feed_bytes(&buf[..n]);
                LINE_ACTIVITY.signal(());
            }
            Err(ReadToBreakError::Other(e)) => {
                warn!("UART read error: {:?}", e);
                assembler.reset();
                LINE_ACTIVITY.signal(());
            }
        }
    }
}
