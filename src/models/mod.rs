mod category;
mod order;
mod product;
mod user;

pub use category::{AgeCategory, Category};
pub use order::{CartItem, Order, OrderLine, PaymentRequest, PaymentResponse};
pub use product::{
    FilterRequest, ImageUpload, ProductData, ProductForm, ProductImage, ProductSummary,
};
pub use user::{
    AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest, User,
    UserRole,
};
