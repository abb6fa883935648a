pub mod ffmpeg_frame_converter;
pub mod ffmpeg_media_source;
