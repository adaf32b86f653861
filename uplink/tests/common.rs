use uplink_session::collaborator::{Collaborator, Failure};
use uplink_session::error::BoxError;
use uplink_session::Config;

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

pub const SATELLITE_ADDR: &str = "satellite.example:7777";

/// A call received by [`Scripted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OpenClient { user_agent: String, in_memory: bool },
    OpenSession {
        client: u32,
        satellite_address: String,
        credential: Vec<u8>,
    },
    CloseClient(u32),
}

/// A session returned by [`Scripted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub client: u32,
    pub satellite_address: String,
}

/// How [`Scripted`] fails the next session.
pub enum SessionFailure {
    Fixed(BoxError),
    /// A native failure with the passed code whose message contains the credential.
    EchoCredential(u32),
}

/// Collaborator test double which records the calls and fails once when it's scripted to.
#[derive(Default)]
pub struct Scripted {
    calls: Rc<RefCell<Vec<Call>>>,
    next_client: Cell<u32>,
    open_client_failure: RefCell<Option<BoxError>>,
    open_session_failure: RefCell<Option<SessionFailure>>,
    close_client_failure: RefCell<Option<BoxError>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_open_client(self, err: BoxError) -> Self {
        self.open_client_failure.replace(Some(err));
        self
    }

    pub fn fail_open_session(self, failure: SessionFailure) -> Self {
        self.open_session_failure.replace(Some(failure));
        self
    }

    pub fn fail_close_client(self, err: BoxError) -> Self {
        self.close_client_failure.replace(Some(err));
        self
    }

    /// Returns the log of calls, which is shared with all the clones.
    pub fn calls(&self) -> Rc<RefCell<Vec<Call>>> {
        Rc::clone(&self.calls)
    }
}

impl Collaborator for Scripted {
    type Client = u32;
    type Session = Session;

    fn open_client(&self, config: &Config) -> Result<u32, BoxError> {
        self.calls.borrow_mut().push(Call::OpenClient {
            user_agent: String::from(config.user_agent()),
            in_memory: config.is_in_memory(),
        });

        if let Some(err) = self.open_client_failure.take() {
            return Err(err);
        }

        let client = self.next_client.get() + 1;
        self.next_client.set(client);
        Ok(client)
    }

    fn open_session(
        &self,
        client: &u32,
        satellite_address: &str,
        credential: &[u8],
    ) -> Result<Session, BoxError> {
        self.calls.borrow_mut().push(Call::OpenSession {
            client: *client,
            satellite_address: String::from(satellite_address),
            credential: credential.to_vec(),
        });

        match self.open_session_failure.take() {
            Some(SessionFailure::Fixed(err)) => Err(err),
            Some(SessionFailure::EchoCredential(code)) => Err(Box::new(Failure::new(
                code,
                format!(
                    "satellite {} rejected API key {}",
                    satellite_address,
                    String::from_utf8_lossy(credential)
                ),
            ))),
            None => Ok(Session {
                client: *client,
                satellite_address: String::from(satellite_address),
            }),
        }
    }

    fn close_client(&self, client: u32) -> Result<(), BoxError> {
        self.calls.borrow_mut().push(Call::CloseClient(client));

        match self.close_client_failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In memory sink for the log output.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("log buffer lock poisoned");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` capturing all the log events that it emits and returns its result and the log
/// output.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();

    let res = tracing::subscriber::with_default(subscriber, f);
    (res, logs.contents())
}
