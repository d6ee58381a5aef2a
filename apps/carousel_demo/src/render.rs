//! Terminal stand-in for the rendering and live-region collaborators.

use anyhow::Result;
use async_trait::async_trait;
use carousel_core::RotationSnapshot;
use serde::Serialize;
use shared::{
    domain::Item,
    error::ControllerError,
    protocol::{Announcement, RotationFrame},
};
use tokio::io::{AsyncWrite, AsyncWriteExt};

#[async_trait]
pub trait FrameRenderer: Send {
    async fn render_frame(&mut self, frame: &RotationFrame, items: &[Item]) -> Result<()>;
    async fn render_announcement(&mut self, announcement: &Announcement) -> Result<()>;
    async fn render_status(&mut self, snapshot: &RotationSnapshot) -> Result<()>;
    async fn render_error(&mut self, error: &ControllerError) -> Result<()>;
    async fn render_notice(&mut self, message: &str) -> Result<()>;
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonLine<'a> {
    Frame {
        frame: &'a RotationFrame,
        visible_titles: Vec<&'a str>,
    },
    Announcement {
        announcement: &'a Announcement,
    },
    Status {
        current_index: Option<usize>,
        playing: bool,
        window_size: usize,
        visible: &'a [usize],
        item_count: usize,
        autoplay: shared::protocol::AutoplayCapability,
    },
    Error {
        error: &'a ControllerError,
    },
    Notice {
        message: &'a str,
    },
}

/// Writes frames either as a one-line text strip or as JSON lines.
pub struct TerminalRenderer<W> {
    out: W,
    json: bool,
}

impl<W: AsyncWrite + Unpin + Send> TerminalRenderer<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn write_json(&mut self, line: &JsonLine<'_>) -> Result<()> {
        let encoded = serde_json::to_string(line)?;
        self.write_line(&encoded).await
    }
}

fn text_strip(frame: &RotationFrame, items: &[Item]) -> String {
    let cards = frame
        .visible
        .iter()
        .filter_map(|&index| items.get(index))
        .map(|item| format!("{} {}", item.value, item.title))
        .collect::<Vec<_>>()
        .join(" | ");
    let dots = (0..frame.item_count)
        .map(|index| if index == frame.current_index { 'o' } else { '.' })
        .collect::<String>();
    let mode = if frame.playing { "playing" } else { "paused" };
    format!(
        "[{}/{} {mode}] {cards}  {dots}",
        frame.current_index + 1,
        frame.item_count
    )
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> FrameRenderer for TerminalRenderer<W> {
    async fn render_frame(&mut self, frame: &RotationFrame, items: &[Item]) -> Result<()> {
        if self.json {
            let visible_titles = frame
                .visible
                .iter()
                .filter_map(|&index| items.get(index))
                .map(|item| item.title.as_str())
                .collect();
            return self
                .write_json(&JsonLine::Frame {
                    frame,
                    visible_titles,
                })
                .await;
        }
        let line = text_strip(frame, items);
        self.write_line(&line).await
    }

    async fn render_announcement(&mut self, announcement: &Announcement) -> Result<()> {
        if self.json {
            return self
                .write_json(&JsonLine::Announcement { announcement })
                .await;
        }
        let line = format!(
            "  (aria-live={}) {}",
            announcement.politeness.aria_live(),
            announcement.message
        );
        self.write_line(&line).await
    }

    async fn render_status(&mut self, snapshot: &RotationSnapshot) -> Result<()> {
        if self.json {
            return self
                .write_json(&JsonLine::Status {
                    current_index: snapshot.current_index,
                    playing: snapshot.playing,
                    window_size: snapshot.window_size,
                    visible: &snapshot.visible,
                    item_count: snapshot.item_count,
                    autoplay: snapshot.autoplay,
                })
                .await;
        }
        let line = match snapshot.current_index {
            Some(index) => format!(
                "status: item {} of {}, window {}, visible {:?}, playing {}, autoplay {:?}",
                index + 1,
                snapshot.item_count,
                snapshot.window_size,
                snapshot.visible,
                snapshot.playing,
                snapshot.autoplay
            ),
            None => "status: no items".to_string(),
        };
        self.write_line(&line).await
    }

    async fn render_error(&mut self, error: &ControllerError) -> Result<()> {
        if self.json {
            return self.write_json(&JsonLine::Error { error }).await;
        }
        let line = format!("error ({:?}): {}", error.code, error.message);
        self.write_line(&line).await
    }

    async fn render_notice(&mut self, message: &str) -> Result<()> {
        if self.json {
            return self.write_json(&JsonLine::Notice { message }).await;
        }
        self.write_line(message).await
    }
}
