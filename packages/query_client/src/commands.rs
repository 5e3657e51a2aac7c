//! Typed helpers for the common administration commands.

use query_wire::{Command, DecodeResponse, Record, WireError};

use crate::client::Client;
use crate::error::ClientError;

/// Server version information, from the `version` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub version: String,
    pub build: String,
    pub platform: String,
}

impl DecodeResponse for Version {
    fn decode(lines: &[String]) -> Result<Self, WireError> {
        let record = Record::decode(lines)?;
        Ok(Self {
            version: record.parse("version")?,
            build: record.parse("build")?,
            platform: record.parse("platform")?,
        })
    }
}

/// Session identity, from the `whoami` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhoAmI {
    pub virtualserver_id: u64,
    pub client_id: u64,
    pub client_nickname: String,
}

impl DecodeResponse for WhoAmI {
    fn decode(lines: &[String]) -> Result<Self, WireError> {
        let record = Record::decode(lines)?;
        Ok(Self {
            virtualserver_id: record.parse("virtualserver_id")?,
            client_id: record.parse("client_id")?,
            client_nickname: record.parse("client_nickname")?,
        })
    }
}

/// Event categories accepted by `servernotifyregister`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyEvent {
    Server,
    /// Channel events for the given channel id (0 means all channels).
    Channel {
        id: u64,
    },
    TextServer,
    TextChannel,
    TextPrivate,
    TokenUsed,
}

impl NotifyEvent {
    fn name(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Channel { .. } => "channel",
            Self::TextServer => "textserver",
            Self::TextChannel => "textchannel",
            Self::TextPrivate => "textprivate",
            Self::TokenUsed => "tokenused",
        }
    }
}

impl Client {
    /// Authenticate with a ServerQuery login.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<(), ClientError> {
        self.exec_cmd(
            &Command::new("login")
                .arg("client_login_name", user)
                .arg("client_login_password", password),
        )
        .await
        .map(|_| ())
    }

    /// Drop the current authentication.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.exec_cmd(&Command::new("logout")).await.map(|_| ())
    }

    /// Select the virtual server with the given id.
    pub async fn use_sid(&mut self, id: u64) -> Result<(), ClientError> {
        self.exec_cmd(&Command::new("use").arg("sid", id))
            .await
            .map(|_| ())
    }

    /// Select the virtual server listening on the given voice port.
    pub async fn use_port(&mut self, port: u16) -> Result<(), ClientError> {
        self.exec_cmd(&Command::new("use").arg("port", port))
            .await
            .map(|_| ())
    }

    /// Server version and platform.
    pub async fn version(&mut self) -> Result<Version, ClientError> {
        self.exec_cmd_into(&Command::new("version")).await
    }

    /// Identity of this query session.
    pub async fn whoami(&mut self) -> Result<WhoAmI, ClientError> {
        self.exec_cmd_into(&Command::new("whoami")).await
    }

    /// Ask the server to send notifications for an event category.
    pub async fn server_notify_register(&mut self, event: NotifyEvent) -> Result<(), ClientError> {
        let mut cmd = Command::new("servernotifyregister").arg("event", event.name());
        if let NotifyEvent::Channel { id } = event {
            cmd = cmd.arg("id", id);
        }
        self.exec_cmd(&cmd).await.map(|_| ())
    }

    /// Stop all notification delivery for this session.
    pub async fn server_notify_unregister(&mut self) -> Result<(), ClientError> {
        self.exec_cmd(&Command::new("servernotifyunregister"))
            .await
            .map(|_| ())
    }
}
