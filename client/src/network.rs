//! Joining a match on the server

use log::info;
use shared::{Connection, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// A connection past the handshake
pub struct JoinedMatch<S> {
    pub connection: Connection<S>,
    /// Players in this match, needed to read the results message
    pub cohort_size: usize,
}

/// Reads the cohort size the server opens with and answers with our name.
/// Only the first word of `name` is used by the server.
pub async fn join_match<S>(stream: S, name: &str) -> Result<JoinedMatch<S>, ProtocolError>
where
    S: AsyncRead + AsyncWrite,
{
    let mut connection = Connection::new(stream);
    let cohort_size = connection.next_count().await?;
    connection.send_line(name).await?;
    info!("Joined a match of {} players as {}", cohort_size, name);

    Ok(JoinedMatch {
        connection,
        cohort_size,
    })
}

pub async fn connect(address: &str, name: &str) -> Result<JoinedMatch<TcpStream>, ProtocolError> {
    info!("Connecting to {}", address);
    let stream = TcpStream::connect(address).await?;
    stream.set_nodelay(true)?;
    info!("Connected, waiting for the other players");
    join_match(stream, name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_join_reads_size_then_sends_name() {
        let mock = Builder::new().read(b"3\n").write(b"alice\n").build();
        let joined = join_match(mock, "alice").await.unwrap();
        assert_eq!(joined.cohort_size, 3);
    }

    #[tokio::test]
    async fn test_join_rejects_garbage_size() {
        let mock = Builder::new().read(b"hello\n").build();
        match join_match(mock, "alice").await {
            Err(ProtocolError::BadCount(token)) => assert_eq!(token, "hello"),
            Err(e) => panic!("Unexpected error: {}", e),
            Ok(_) => panic!("Join should have failed"),
        }
    }

    #[tokio::test]
    async fn test_join_refused_connection() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);
        assert!(matches!(
            connect(&address, "alice").await,
            Err(ProtocolError::Io(_))
        ));
    }
}
