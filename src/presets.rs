//! Format preset and content kind codes shared with the import pipeline.

/// Content node kinds. `TOPIC` nodes are structural; everything else is a
/// leaf resource.
pub mod content_kinds {
    pub const TOPIC: &str = "topic";
    pub const VIDEO: &str = "video";
    pub const AUDIO: &str = "audio";
    pub const EXERCISE: &str = "exercise";
    pub const DOCUMENT: &str = "document";
    pub const HTML5: &str = "html5";
}

/// Human-readable label for a format preset code.
///
/// Unknown codes degrade to a generic label rather than failing; imported
/// databases may carry presets this server predates.
pub fn preset_label(preset: &str) -> &'static str {
    match preset {
        "high_res_video" => "High Resolution",
        "low_res_video" => "Low Resolution",
        "vector_video" => "Vectorized",
        "video_thumbnail" | "audio_thumbnail" | "document_thumbnail"
        | "exercise_thumbnail" | "topic_thumbnail" | "html5_thumbnail" => "Thumbnail",
        "video_subtitle" => "Subtitle",
        "audio" => "Audio",
        "document" => "Document",
        "exercise" => "Exercise",
        "exercise_image" => "Exercise Image",
        "exercise_graphie" => "Exercise Graphie",
        "channel_thumbnail" => "Channel Thumbnail",
        "html5_zip" => "HTML5 Zip",
        _ => "Unknown format",
    }
}
