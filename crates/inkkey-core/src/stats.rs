use crate::types::*;

/// Calculate summary statistics for an analysis result
pub fn calculate_summary(levels: &InkLevels) -> Result<InkSummary> {
    let num_keys = levels.num_keys();
    if num_keys == 0 {
        return Err(InkError::Config("No ink keys to summarize".to_string()));
    }

    let channels: Vec<ChannelSummary> = Channel::ALL
        .iter()
        .map(|&channel| summarize_channel(channel, levels.channel(channel)))
        .collect();

    let total_coverage = channels.iter().map(|c| c.mean).sum();

    Ok(InkSummary {
        num_keys,
        channels,
        total_coverage,
    })
}

fn summarize_channel(channel: Channel, values: &[u8]) -> ChannelSummary {
    let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let mean = total as f32 / values.len() as f32;

    // First zone wins on ties
    let (peak_index, peak_value) = values
        .iter()
        .copied()
        .enumerate()
        .fold((0, 0u8), |best, (i, v)| if v > best.1 { (i, v) } else { best });

    ChannelSummary {
        channel,
        mean,
        peak_zone: peak_index + 1,
        peak_value,
    }
}
