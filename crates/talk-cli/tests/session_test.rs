//! Session tests
//!
//! Drive both establishers and the dialogue loop in-process, over loopback
//! TCP or in-memory pipes, with plain consoles fed from channels.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use mytalk::console::{InputChunk, PlainConsole};
use mytalk::establish::{accept_one, connect, request_talk, Established};
use mytalk::session::{converse, run, Outcome, Session};
use talk_core::config::Options;
use talk_core::traits::{answer_is_yes, Prompt};
use talk_core::{ConnectionRequest, Role, SessionState};
use talk_protocol::CONNECTION_CLOSED_NOTICE;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Answers every request with a fixed line, like an operator would type it
struct TypedAnswer(&'static str);

#[async_trait]
impl Prompt for TypedAnswer {
    async fn confirm(&mut self, _request: &ConnectionRequest) -> io::Result<bool> {
        Ok(answer_is_yes(self.0))
    }
}

fn console() -> (mpsc::Sender<InputChunk>, SharedBuf, PlainConsole<SharedBuf>) {
    let (tx, rx) = mpsc::channel(16);
    let out = SharedBuf::default();
    (tx, out.clone(), PlainConsole::with_parts(rx, out))
}

async fn wait_for(out: &SharedBuf, needle: &str) {
    timeout(WAIT, async {
        while !out.contents().contains(needle) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {:?}, have {:?}", needle, out.contents()));
}

fn client_session(pending: &'static [u8]) -> (Session<DuplexStream>, DuplexStream) {
    let (ours, theirs) = duplex(4096);
    let session = Session::new(Role::Client, ours, "peer", Bytes::from_static(pending));
    (session, theirs)
}

async fn handshake(
    options: Options,
    prompt: TypedAnswer,
) -> (
    Established<tokio::net::TcpStream>,
    Established<tokio::net::TcpStream>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut prompt = prompt;
        accept_one(listener, &options, &mut prompt).await
    });

    let stream = connect(&[addr]).await.unwrap();
    let client = request_talk(stream, "localhost", "alice").await.unwrap();
    let server = server.await.unwrap().unwrap();
    (server, client)
}

#[tokio::test]
async fn test_full_talk_over_tcp() {
    let options = Options {
        auto_accept: true,
        ..Options::default()
    };
    let (server, client) = handshake(options, TypedAnswer("n")).await;

    let Established::Accepted(server) = server else {
        panic!("server should accept");
    };
    let Established::Accepted(client) = client else {
        panic!("client should be accepted");
    };
    assert_eq!(server.peer_name(), "alice");
    assert_eq!(client.peer_name(), "localhost");

    let (server_tx, server_out, server_console) = console();
    let (client_tx, client_out, client_console) = console();
    let server_cancel = CancellationToken::new();
    let client_cancel = CancellationToken::new();

    let server_task = {
        let cancel = server_cancel.clone();
        tokio::spawn(async move { converse(server, server_console, 0, &cancel).await })
    };
    let client_task = {
        let cancel = client_cancel.clone();
        tokio::spawn(async move { converse(client, client_console, 0, &cancel).await })
    };

    client_tx.send(Ok(b"hello\n".to_vec())).await.unwrap();
    wait_for(&server_out, "hello\n").await;

    server_tx.send(Ok(b"bye\n".to_vec())).await.unwrap();
    let server_outcome = timeout(WAIT, server_task).await.unwrap().unwrap().unwrap();
    assert_eq!(server_outcome, Outcome::LocalClosed);

    wait_for(&client_out, CONNECTION_CLOSED_NOTICE).await;
    assert_eq!(
        client_out.contents(),
        format!("bye\n{}\n", CONNECTION_CLOSED_NOTICE)
    );

    // The client lingers until interrupted
    assert!(!client_task.is_finished());
    client_cancel.cancel();
    let client_outcome = timeout(WAIT, client_task).await.unwrap().unwrap().unwrap();
    assert_eq!(client_outcome, Outcome::PeerClosed);
}

#[tokio::test]
async fn test_operator_answers() {
    for (answer, accepted) in [("y\n", true), ("Yes\n", true), ("n\n", false), ("\n", false)] {
        let (server, client) = handshake(Options::default(), TypedAnswer(answer)).await;
        assert_eq!(
            matches!(server, Established::Accepted(_)),
            accepted,
            "answer {:?}",
            answer
        );
        assert_eq!(
            matches!(client, Established::Accepted(_)),
            accepted,
            "answer {:?}",
            answer
        );
    }
}

#[tokio::test]
async fn test_only_accepted_handshakes_yield_a_session() {
    let (server, client) = handshake(Options::default(), TypedAnswer("n\n")).await;
    assert!(matches!(server, Established::Rejected { ref peer } if peer == "alice@127.0.0.1"));
    assert!(matches!(client, Established::Rejected { ref peer } if peer == "localhost"));

    let (server, _client) = handshake(Options::default(), TypedAnswer("y\n")).await;
    let Established::Accepted(session) = server else {
        panic!("server should accept");
    };
    assert!(session.is_open());
    assert_eq!(session.state(), SessionState::Establishing);
}

#[tokio::test]
async fn test_peer_hang_up_shows_notice() {
    let (mut session, peer) = client_session(b"");
    let (_tx, out, mut console) = console();
    drop(peer);

    let outcome = run(&mut session, &mut console, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::PeerClosed);
    assert_eq!(out.contents(), format!("{}\n", CONNECTION_CLOSED_NOTICE));
    assert!(!session.is_open());
    assert_eq!(session.state(), SessionState::PeerClosed);
}

#[tokio::test]
async fn test_goodbye_is_not_a_keyword_but_byebye_is() {
    let (mut session, mut peer) = client_session(b"");
    let (_tx, out, mut console) = console();

    let task = tokio::spawn(async move {
        let outcome = run(&mut session, &mut console, &CancellationToken::new()).await;
        (outcome, session)
    });

    peer.write_all(b"goodbye\n").await.unwrap();
    wait_for(&out, "goodbye\n").await;
    assert!(!task.is_finished());

    peer.write_all(b"byebye\n").await.unwrap();
    let (outcome, session) = timeout(WAIT, task).await.unwrap().unwrap();
    assert_eq!(outcome.unwrap(), Outcome::PeerClosed);
    assert_eq!(
        out.contents(),
        format!("goodbye\nbyebye\n{}\n", CONNECTION_CLOSED_NOTICE)
    );
    assert!(!session.is_open());
}

#[tokio::test]
async fn test_local_line_reaches_peer_verbatim() {
    let (mut session, mut peer) = client_session(b"");
    let (tx, _out, mut console) = console();

    tx.send(Ok(b"hi there\tfriend\n".to_vec())).await.unwrap();
    tx.send(Ok(b"bye\n".to_vec())).await.unwrap();

    let outcome = run(&mut session, &mut console, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::LocalClosed);
    assert_eq!(session.state(), SessionState::LocalClosed);

    let mut received = Vec::new();
    peer.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"hi there\tfriend\nbye\n");
}

#[tokio::test]
async fn test_end_of_input_closes_locally() {
    let (mut session, mut peer) = client_session(b"");
    let (tx, _out, mut console) = console();

    tx.send(Ok(b"last words".to_vec())).await.unwrap();
    drop(tx);

    let outcome = run(&mut session, &mut console, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::LocalClosed);

    let mut received = Vec::new();
    peer.read_to_end(&mut received).await.unwrap();
    assert_eq!(received, b"last words");
}

#[tokio::test]
async fn test_bytes_read_with_the_verdict_are_rendered() {
    let (ours, mut theirs) = duplex(4096);
    // Verdict frame and the first dialogue chunk in one write
    theirs.write_all(b"\x02\x00\x02okearly\n").await.unwrap();
    let established = request_talk(ours, "peer", "alice").await.unwrap();
    let Established::Accepted(mut session) = established else {
        panic!("expected acceptance");
    };

    let (_tx, out, mut console) = console();
    drop(theirs);

    let outcome = run(&mut session, &mut console, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::PeerClosed);
    assert!(out.contents().starts_with("early\n"));
}

#[tokio::test]
async fn test_leftover_bye_ends_dialogue() {
    let (mut session, _peer) = client_session(b"bye\n");
    let (_tx, out, mut console) = console();

    let outcome = run(&mut session, &mut console, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::PeerClosed);
    assert_eq!(out.contents(), format!("bye\n{}\n", CONNECTION_CLOSED_NOTICE));
}

#[tokio::test]
async fn test_interrupt_ends_dialogue() {
    let (mut session, _peer) = client_session(b"");
    let (_tx, _out, mut console) = console();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = run(&mut session, &mut console, &cancel).await.unwrap();
    assert_eq!(outcome, Outcome::Interrupted);
    assert!(!session.is_open());
    assert_eq!(session.state(), SessionState::Terminated);
}

#[tokio::test]
async fn test_converse_holds_until_interrupt_after_peer_bye() {
    let (session, mut peer) = client_session(b"");
    let (_tx, out, console) = console();
    let cancel = CancellationToken::new();

    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move { converse(session, console, 0, &cancel).await })
    };

    peer.write_all(b"bye\n").await.unwrap();
    wait_for(&out, CONNECTION_CLOSED_NOTICE).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!task.is_finished());

    cancel.cancel();
    let outcome = timeout(WAIT, task).await.unwrap().unwrap().unwrap();
    assert_eq!(outcome, Outcome::PeerClosed);
}
