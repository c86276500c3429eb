use reqwest::{
    Client,
    multipart::{Form, Part},
};

use crate::{Res, config, types::Artwork};

/// Uploads locally extracted artwork to the anonymous file host and
/// returns the public URL.
///
/// Used as the last artwork fallback when neither catalog knows the track
/// but the player's own library carries cover art. The host answers with
/// the bare URL as plain text.
///
/// # Errors
///
/// Fails on HTTP/network errors or when the host's reply does not look
/// like a URL.
pub async fn upload_artwork(client: &Client, artwork: Artwork) -> Res<String> {
    let extension = match artwork.mime {
        "image/png" => "png",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "jpg",
    };

    let part = Part::bytes(artwork.data)
        .file_name(format!("artwork.{}", extension))
        .mime_str(artwork.mime)?;
    let form = Form::new()
        .text("reqtype", "fileupload")
        .part("fileToUpload", part);

    let response = client
        .post(config::artwork_upload_url())
        .multipart(form)
        .send()
        .await?
        .error_for_status()?;

    let url = response.text().await?.trim().to_string();
    if !url.starts_with("http") {
        return Err(format!("Unexpected upload response: {}", url).into());
    }
    Ok(url)
}
