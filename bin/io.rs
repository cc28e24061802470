use std::{fmt::Display, io};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::instrument;

/// A line oriented io interface.
#[derive(Debug)]
pub struct Pipe<W: AsyncWrite, R: AsyncRead> {
    writer: W,
    reader: Lines<BufReader<R>>,
}

impl<W: AsyncWrite, R: AsyncRead> Pipe<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Pipe {
            writer,
            reader: BufReader::new(reader).lines(),
        }
    }
}

impl<W: AsyncWrite + Unpin, R: AsyncRead + Unpin> Pipe<W, R> {
    /// Receive a message, or `None` once the reader is exhausted.
    #[instrument(level = "trace", skip(self), ret, err)]
    pub async fn recv(&mut self) -> io::Result<Option<String>> {
        self.reader.next_line().await
    }

    /// Send a message.
    #[instrument(level = "trace", skip(self, msg), err, fields(%msg))]
    pub async fn send<T: Display>(&mut self, msg: T) -> io::Result<()> {
        self.writer.write_all(msg.to_string().as_bytes()).await?;
        self.writer.write_u8(b'\n').await?;
        Ok(())
    }

    /// Flush the internal buffers.
    #[instrument(level = "trace", skip(self), err)]
    pub async fn flush(&mut self) -> io::Result<()> {
        self.writer.flush().await
    }
}
