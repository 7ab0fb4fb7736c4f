// Command sender - Fire-and-forget delivery of device commands
use crate::application::broker_client::BrokerClient;
use crate::domain::channel::CommandName;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandSender {
    broker: Arc<dyn BrokerClient>,
}

impl CommandSender {
    pub fn new(broker: Arc<dyn BrokerClient>) -> Self {
        Self { broker }
    }

    /// Failures are logged and swallowed
    pub async fn send(&self, command: CommandName) {
        match self.broker.send_command(command).await {
            Ok(()) => tracing::debug!(%command, "Command delivered"),
            Err(e) => tracing::error!(%command, error = %e, "Failed to send command"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fake_broker::FakeBroker;
    use crate::domain::channel::Channel;

    #[tokio::test]
    async fn test_send_swallows_errors() {
        let broker = Arc::new(FakeBroker::rejecting_commands());
        let sender = CommandSender::new(broker.clone());

        sender.send(CommandName::alert(Channel::Humidity)).await;
        sender.send(CommandName::normal(Channel::Humidity)).await;

        assert_eq!(
            broker.commands(),
            vec![CommandName::alert(Channel::Humidity), CommandName::normal(Channel::Humidity)]
        );
    }
}
