fn main() {
    grid_demo::run();
}
