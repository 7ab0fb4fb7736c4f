// Trigger evaluator - Latest value per channel against its bounds
use crate::application::command_sender::CommandSender;
use crate::domain::channel::{Channel, CommandName};
use crate::domain::series::SeriesState;
use crate::domain::trigger::Thresholds;

/// One command per channel that has at least one value, in channel order.
pub fn evaluate(state: &SeriesState, thresholds: &Thresholds) -> Vec<CommandName> {
    Channel::ALL
        .into_iter()
        .filter_map(|channel| {
            let latest = state.latest(channel)?;
            if thresholds.for_channel(channel).is_outside(latest) {
                Some(CommandName::alert(channel))
            } else {
                Some(CommandName::normal(channel))
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct TriggerEvaluator {
    thresholds: Thresholds,
    sender: CommandSender,
}

impl TriggerEvaluator {
    pub fn new(thresholds: Thresholds, sender: CommandSender) -> Self {
        Self { thresholds, sender }
    }

    /// Evaluate and send every resulting command. Nothing is debounced, so
    /// an unchanged state re-sends the same commands.
    pub async fn run(&self, state: &SeriesState) -> Vec<CommandName> {
        let commands = evaluate(state, &self.thresholds);
        for command in &commands {
            tracing::info!(%command, "Sending trigger command");
            self.sender.send(*command).await;
        }
        commands
    }
}
