// 缓存操作
// 穿透读取与模式失效，实现为 CacheClient 的方法

pub mod invalidate;
pub mod value;
