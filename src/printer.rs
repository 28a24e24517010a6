use log::{debug, info};
use std::{
    io::Write,
    net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{
    error::{Error, Result},
    zpl::LabelCommand,
};

/// Raw (JetDirect) printing port.
pub const DEFAULT_PORT: u16 = 9100;

/// A network printer reachable over raw TCP.
///
/// Each [`Printer::print`] call opens its own connection, writes the whole
/// command and closes it again. Nothing is read back.
pub struct Printer {
    config: Config,
}

impl Printer {
    pub fn new(config: Config) -> Self {
        Printer { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send one label.
    ///
    /// Fails with [`Error::Connection`] when the printer can't be reached and
    /// with [`Error::Transmission`] when the command is not written in full.
    /// There is no retry.
    pub fn print(&self, command: &LabelCommand) -> Result<()> {
        let mut stream = self.connect()?;

        if let Some(timeout) = self.config.write_timeout {
            stream
                .set_write_timeout(Some(timeout))
                .map_err(Error::Transmission)?;
        }

        write_command(&mut stream, command.as_bytes())?;
        // Everything is written at this point; a peer that already hung up
        // makes shutdown fail on some platforms without losing the label.
        if let Err(err) = stream.shutdown(Shutdown::Write) {
            debug!("shutdown after complete write failed: {:?}", err);
        }

        info!(
            "Sent {} bytes to printer at {}",
            command.len(),
            self.config.address()
        );
        Ok(())
    }

    fn connect(&self) -> Result<TcpStream> {
        let addr = self.config.address();
        let connection_error = |source| Error::Connection {
            addr: addr.clone(),
            source,
        };

        let candidates: Vec<SocketAddr> = (self.config.host.as_str(), self.config.port)
            .to_socket_addrs()
            .map_err(connection_error)?
            .collect();
        debug!("Resolved {} to {:?}", addr, candidates);

        let stream = match self.config.connect_timeout {
            None => TcpStream::connect(&candidates[..]).map_err(connection_error)?,
            Some(timeout) => {
                let mut last_err = std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "host resolved to no addresses",
                );
                let mut connected = None;
                for candidate in &candidates {
                    match TcpStream::connect_timeout(candidate, timeout) {
                        Ok(stream) => {
                            connected = Some(stream);
                            break;
                        }
                        Err(err) => {
                            debug!("Failed to connect to {}: {:?}", candidate, err);
                            last_err = err;
                        }
                    }
                }
                match connected {
                    Some(stream) => stream,
                    None => return Err(connection_error(last_err)),
                }
            }
        };

        debug!("Connected to printer at {}", addr);
        Ok(stream)
    }
}

/// Send `command` to `host:port` with no timeouts.
pub fn send(command: &LabelCommand, host: &str, port: u16) -> Result<()> {
    Printer::new(Config::new(host).port(port)).print(command)
}

fn write_command<W: Write>(writer: &mut W, buf: &[u8]) -> Result<()> {
    match writer.write_all(buf).and_then(|_| writer.flush()) {
        Ok(()) => Ok(()),
        Err(err) => {
            debug!(
                "write error: {:?} while sending {} bytes, peer closed early ?",
                err,
                buf.len()
            );
            Err(Error::Transmission(err))
        }
    }
}

/// Where and how to reach the printer.
#[derive(Debug, Clone)]
pub struct Config {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Config {
    /// Initialize configuration for `host` on the default port, with no timeouts.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use zpl_label::Config;
    ///
    /// let config = Config::new("192.168.0.243")
    ///     .port(9100)
    ///     .connect_timeout(Duration::from_secs(5));
    /// assert_eq!(config.address(), "192.168.0.243:9100");
    /// ```
    pub fn new<S: Into<String>>(host: S) -> Config {
        Config {
            host: host.into(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            write_timeout: None,
        }
    }

    pub fn port(self, port: u16) -> Self {
        Config { port, ..self }
    }

    /// Give up connecting after `timeout`.
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        Config {
            connect_timeout: Some(timeout),
            ..self
        }
    }

    /// Give up on a single blocked write after `timeout`.
    pub fn write_timeout(self, timeout: Duration) -> Self {
        Config {
            write_timeout: Some(timeout),
            ..self
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `host:port`, as used in log and error messages.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Accepts `capacity` bytes, then reports a closed peer.
    struct ShortWriter {
        written: Vec<u8>,
        capacity: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.capacity - self.written.len());
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::new("printer.local");
        assert_eq!(config.host(), "printer.local");
        assert_eq!(config.address(), "printer.local:9100");
        assert!(config.connect_timeout.is_none());
        assert!(config.write_timeout.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = Config::new("10.0.0.5")
            .port(6101)
            .connect_timeout(Duration::from_secs(3))
            .write_timeout(Duration::from_secs(7));
        assert_eq!(config.address(), "10.0.0.5:6101");
        assert_eq!(config.connect_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.write_timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_write_command_full() {
        let mut writer = ShortWriter {
            written: Vec::new(),
            capacity: 64,
        };
        write_command(&mut writer, b"^XA^XZ").unwrap();
        assert_eq!(writer.written, b"^XA^XZ");
    }

    #[test]
    fn test_write_command_short_write_is_transmission_error() {
        let mut writer = ShortWriter {
            written: Vec::new(),
            capacity: 3,
        };
        let err = write_command(&mut writer, b"^XA^XZ").unwrap_err();
        match err {
            Error::Transmission(io_err) => assert_eq!(io_err.kind(), io::ErrorKind::WriteZero),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
