mod controls;
mod playback;
mod synthetic;
