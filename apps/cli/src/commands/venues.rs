//! `venuesync venues`

use venuesync_client::{ClientConfig, VenueApiClient};

pub async fn run(config: &ClientConfig) -> anyhow::Result<()> {
    let client = VenueApiClient::new(config)?;
    let venues = client.venues().await?;

    for venue in &venues {
        let published = venue
            .get("isPublished")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        println!(
            "{}\t{}\t{}",
            venue.id().unwrap_or("-"),
            venue.name().unwrap_or("-"),
            if published { "published" } else { "draft" }
        );
    }
    println!("{} venue(s)", venues.len());

    Ok(())
}
