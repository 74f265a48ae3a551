fn main() {
    lesson_player_lib::run()
}
