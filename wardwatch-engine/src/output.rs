//! Output backends for published rosters.

use std::path::PathBuf;
use std::sync::Arc;

use wardwatch_types::Roster;

/// Where the tick driver sends each roster it publishes.
#[derive(Debug)]
pub enum Output {
    /// Write the roster to a JSON file.
    ///
    /// The file is overwritten after every tick.
    File(PathBuf),

    /// Send rosters through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<Arc<Roster>>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use wardwatch_engine::Output;
    ///
    /// let output = Output::file("ward.json");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// Sends never block the driver: when the receiver falls behind and the
    /// buffer is full, that roster is dropped for this output.
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<Arc<Roster>>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Emit a roster to this output.
    #[cfg(feature = "tokio")]
    pub(crate) async fn emit(&self, roster: &Arc<Roster>) -> std::io::Result<()> {
        match self {
            Output::File(path) => {
                let json = serde_json::to_string_pretty(roster.as_ref())?;
                tokio::fs::write(path, json).await?;
            }
            Output::Channel(tx) => {
                let _ = tx.try_send(Arc::clone(roster));
            }
        }
        Ok(())
    }
}
