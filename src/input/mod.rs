pub mod swipe_tracker;
