use tokio::io::{self, AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tracing::{debug, error, info, instrument};

use crate::commands::executable::Executable;
use crate::commands::Command;
use crate::config::Config;
use crate::connection::Connection;
use crate::store::Store;
use crate::Error;

/// Why a session stopped reading commands.
#[derive(Debug, PartialEq, Eq)]
pub enum Shutdown {
    /// The client sent `END`.
    Requested,
    /// The input was exhausted.
    EndOfInput,
}

pub async fn run(config: Config) -> Result<(), Error> {
    // stdout carries replies, so logs go to stderr.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(config.log_level)
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let mut store = Store::new();

    match &config.listen {
        Some(addr) => {
            let listener = TcpListener::bind(addr).await?;
            serve(listener, &mut store, &config).await
        }
        None => {
            let mut conn = Connection::with_max_line_length(
                io::stdin(),
                io::stdout(),
                config.max_line_length,
            );
            handle_connection(&mut conn, &mut store).await?;
            Ok(())
        }
    }
}

/// Accepts clients one after another, each served to completion against the same store. Returns
/// once a client sends `END`.
pub async fn serve(listener: TcpListener, store: &mut Store, config: &Config) -> Result<(), Error> {
    info!("stackdb listening on {}", listener.local_addr()?);

    loop {
        let (socket, client_address) = listener.accept().await?;
        info!("Accepted connection from {:?}", client_address);

        let (reader, writer) = socket.into_split();
        let mut conn = Connection::with_max_line_length(reader, writer, config.max_line_length);

        match handle_connection(&mut conn, store).await {
            Ok(Shutdown::Requested) => {
                info!("Shutdown requested by {}", client_address);
                return Ok(());
            }
            Ok(Shutdown::EndOfInput) => {}
            Err(e) => error!("Connection from {} failed: {}", client_address, e),
        }
    }
}

#[instrument(name = "connection", skip_all, fields(connection_id = %conn.id))]
pub async fn handle_connection<R, W>(
    conn: &mut Connection<R, W>,
    store: &mut Store,
) -> Result<Shutdown, Error>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(frame) = conn.read_frame().await? {
        debug!("Received frame from client: {}", frame);

        let cmd = match Command::try_from(frame) {
            Ok(cmd) => cmd,
            Err(err) => {
                debug!(?err, "Rejected command");
                conn.write_frame(err.into()).await?;
                continue;
            }
        };

        if cmd.is_end() {
            info!("Session ended by client");
            return Ok(Shutdown::Requested);
        }

        let res = cmd.exec(store)?;
        debug!(
            depth = store.depth(),
            keys = store.len(),
            "Sending response to client: {}",
            res
        );

        conn.write_frame(res).await?;
    }

    info!("Connection closed");
    Ok(Shutdown::EndOfInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn session(input: &str) -> (Shutdown, String, Store) {
        let mut store = Store::new();
        let mut conn = Connection::new(input.as_bytes(), Vec::new());

        let shutdown = handle_connection(&mut conn, &mut store).await.unwrap();
        let output = String::from_utf8(conn.into_writer()).unwrap();

        (shutdown, output, store)
    }

    #[tokio::test]
    async fn begin_set_get() {
        let (shutdown, output, store) = session("BEGIN\nSET a 50\nGET a\n").await;

        assert_eq!(output, "50\n");
        assert_eq!(shutdown, Shutdown::EndOfInput);
        assert_eq!(store.depth(), 1);
    }

    #[tokio::test]
    async fn numequalto_after_unset() {
        let (_, output, _) =
            session("SET a 10\nSET b 10\nNUMEQUALTO 10\nUNSET a\nNUMEQUALTO 10\n").await;

        assert_eq!(output, "2\n1\n");
    }

    #[tokio::test]
    async fn commit_flattens_nested_transactions() {
        let (_, output, _) =
            session("BEGIN\nSET a 10\nBEGIN\nSET a 20\nCOMMIT\nGET a\nROLLBACK\n").await;

        assert_eq!(output, "20\nNO TRANSACTION\n");
    }

    #[tokio::test]
    async fn rollback_restores_previous_value() {
        let (_, output, _) = session("SET k v1\nBEGIN\nSET k v2\nROLLBACK\nGET k\n").await;

        assert_eq!(output, "v1\n");
    }

    #[tokio::test]
    async fn errors_do_not_end_the_session() {
        let input = "ROLLBACK\nCOMMIT\nPING\nSET a\nGET a b\nSET a 1\nGET a\n";
        let (shutdown, output, _) = session(input).await;

        assert_eq!(
            output,
            "NO TRANSACTION\n\
             NO TRANSACTION\n\
             Invalid command. Try again.\n\
             ERR wrong number of arguments for 'SET' command\n\
             ERR wrong number of arguments for 'GET' command\n\
             1\n"
        );
        assert_eq!(shutdown, Shutdown::EndOfInput);
    }

    #[tokio::test]
    async fn double_space_counts_as_an_argument() {
        let (_, output, store) = session("SET a  b\nGET a\n").await;

        assert_eq!(
            output,
            "ERR wrong number of arguments for 'SET' command\n\
             NULL\n"
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn end_stops_reading() {
        let (shutdown, output, store) = session("SET a 1\nEND\nSET b 2\nGET a\n").await;

        assert_eq!(output, "");
        assert_eq!(shutdown, Shutdown::Requested);
        assert_eq!(store.get("b"), None);
    }

    #[tokio::test]
    async fn last_line_without_newline() {
        let (_, output, _) = session("SET a 1\r\nGET a").await;

        assert_eq!(output, "1\n");
    }

    #[tokio::test]
    async fn get_unknown_key() {
        let (_, output, _) = session("GET nothing\nNUMEQUALTO nothing\n").await;

        assert_eq!(output, "NULL\n0\n");
    }
}
