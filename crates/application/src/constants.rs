/// Timer period of the frame loop.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 30;

/// Feature length of the reference 21-point hand detector.
pub const DEFAULT_TARGET_LENGTH: usize = handsign_landmarks::FEATURE_LENGTH;

/// Capacity of the GUI action channel.
pub const ACTION_CHANNEL_CAPACITY: usize = 32;
